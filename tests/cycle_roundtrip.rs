use treestate::collection::DiffCollection;
use treestate::cycle;
use treestate::entry::Entry;
use treestate::node::Node;
use treestate::value::State;

fn menu(texts: &[&str]) -> DiffCollection<Entry> {
	texts.iter().copied().map(Entry::with_text).collect()
}

/// The transport armors the payload however it likes; it only has to echo it
/// back verbatim. Exercised here through JSON.
fn through_transport(payload: &State) -> State {
	let armored = serde_json::to_string(payload).expect("payload serializes");
	serde_json::from_str(&armored).expect("payload deserializes")
}

#[test]
fn clean_cycle_round_trips_field_edits() {
	let mut first = menu(&["n0", "n1", "n2", "n3", "n4"]);
	first.track();
	for (index, entry) in first.iter_mut().enumerate() {
		entry.set_value(format!("command-{index}"));
	}
	first.get_mut(2).unwrap().set_selected(true);
	let payload = through_transport(&first.save().expect("every entry changed"));

	// Next cycle: the framework declaratively rebuilds the same entries.
	let mut second = menu(&["n0", "n1", "n2", "n3", "n4"]);
	second.restore(&payload).expect("round trip");

	assert_eq!(second, first);
	assert!(second[2].selected());
	assert_eq!(second[4].value(), "command-4");
}

#[test]
fn structural_cycle_rebuilds_the_whole_list() {
	let mut first = menu(&["n0", "n1", "n2", "n3", "n4"]);
	first.track();
	first.remove(2);
	first.add(Entry::with_text("n_new"));
	let payload = through_transport(&first.save().expect("structural snapshot"));

	// A structural payload rebuilds from scratch; the fresh collection starts empty.
	let mut second: DiffCollection<Entry> = DiffCollection::new();
	second.restore(&payload).expect("round trip");

	let texts: Vec<&str> = second.iter().map(Entry::text).collect();
	assert_eq!(texts, ["n0", "n1", "n3", "n4", "n_new"]);
	assert_eq!(second, first);
}

#[test]
fn insertion_lands_where_inserted() {
	let mut first = menu(&["a", "c"]);
	first.track();
	first.insert(1, Entry::with_text("b"));
	let payload = first.save().expect("structural snapshot");

	let mut second: DiffCollection<Entry> = DiffCollection::new();
	second.restore(&payload).expect("round trip");
	let texts: Vec<&str> = second.iter().map(Entry::text).collect();
	assert_eq!(texts, ["a", "b", "c"]);
}

#[test]
fn reorder_round_trips() {
	let mut first = menu(&["a", "b", "c"]);
	first.track();
	first.move_item(0, 2);
	let payload = first.save().expect("structural snapshot");

	let mut second: DiffCollection<Entry> = DiffCollection::new();
	second.restore(&payload).expect("round trip");
	let texts: Vec<&str> = second.iter().map(Entry::text).collect();
	assert_eq!(texts, ["b", "c", "a"]);
}

#[test]
fn clear_round_trips_to_empty() {
	let mut first = menu(&["a", "b"]);
	first.track();
	first.clear();
	let payload = first.save().expect("the collection was non-empty this cycle");

	let mut second = menu(&["a", "b"]);
	second.restore(&payload).expect("round trip");
	assert!(second.is_empty());
}

#[test]
fn positions_follow_structural_edits() {
	let mut menu = menu(&["a", "b", "c"]);
	assert_eq!(menu[2].position(), Some(2));

	menu.remove(0);
	assert_eq!(menu[0].position(), Some(0));
	assert_eq!(menu[1].position(), Some(1));

	menu.insert(1, Entry::with_text("x"));
	let positions: Vec<_> = menu.iter().map(Entry::position).collect();
	assert_eq!(positions, [Some(0), Some(1), Some(2)]);

	let detached = menu.remove(1);
	assert_eq!(detached.position(), None);
	assert_eq!(detached.anchor(), None);
}

#[test]
fn anchors_point_at_their_owner() {
	let menu = menu(&["a", "b"]);
	for (index, entry) in menu.iter().enumerate() {
		let anchor = entry.anchor().expect("attached");
		assert_eq!(anchor.owner, menu.id());
		assert_eq!(anchor.index, index);
	}
}

#[test]
fn driver_runs_restore_track_mutate_save() {
	// Cycle 1: first request, nothing to restore.
	let mut first = menu(&["inbox", "sent"]);
	let outgoing = cycle::run(&mut first, None, |cx, menu| {
		assert!(!cx.replayed());
		menu.get_mut(0).unwrap().set_selected(true);
	})
	.expect("nothing to restore, nothing to go wrong");
	let payload = outgoing.expect("a selection changed");

	// Cycle 2: the tree is rebuilt, the echoed payload comes back in.
	let mut second = menu(&["inbox", "sent"]);
	let outgoing = cycle::run(&mut second, Some(&payload), |cx, menu| {
		assert!(cx.replayed());
		assert!(menu[0].selected(), "restore completed before mutations ran");
		menu.add(Entry::with_text("archive"));
	})
	.expect("round trip");

	// The structural edit forces a full snapshot on the way out.
	let payload = outgoing.expect("structural change");
	let mut third: DiffCollection<Entry> = DiffCollection::new();
	third.restore(&payload).expect("round trip");
	assert_eq!(third.len(), 3);
	assert!(third[0].selected());
	assert_eq!(third[2].text(), "archive");
}

#[test]
fn abandoned_cycle_persists_nothing() {
	let mut first = menu(&["a"]);
	first.track();
	first.get_mut(0).unwrap().set_text("lost");
	// The request is abandoned: save is never called, the tree is dropped.
	drop(first);

	// The previous payload (none at all here) is what the next cycle sees.
	let second = menu(&["a"]);
	assert_eq!(second[0].text(), "a");
}

use treestate::error::{ConfigurationError, MalformedPayload};
use treestate::key::{KeyedRow, RowKey, RowKeySet};
use treestate::value::{State, Value};

struct Order {
	id: i64,
	region: &'static str,
	total: f64,
}

impl KeyedRow for Order {
	fn field(&self, column: &str) -> Option<Value> {
		match column {
			"id" => Some(Value::Int(self.id)),
			"region" => Some(Value::Text(self.region.to_owned())),
			"total" => Some(Value::Float(self.total)),
			_ => None,
		}
	}
}

fn orders() -> Vec<Order> {
	vec![
		Order { id: 1, region: "emea", total: 10.0 },
		Order { id: 2, region: "emea", total: 20.0 },
		Order { id: 3, region: "apac", total: 30.0 },
	]
}

#[test]
fn equal_named_keys_compare_equal() {
	let left = RowKey::from_pairs([("id", Value::Int(1)), ("region", Value::from("emea"))]);
	let right = RowKey::from_pairs([("id", Value::Int(1)), ("region", Value::from("emea"))]);
	assert_eq!(left, right);
}

#[test]
fn reordered_columns_compare_equal() {
	let left = RowKey::from_pairs([("id", Value::Int(1)), ("region", Value::from("emea"))]);
	let right = RowKey::from_pairs([("region", Value::from("emea")), ("id", Value::Int(1))]);
	assert_eq!(left, right);
}

#[test]
fn named_keys_compare_names_not_just_values() {
	let left = RowKey::from_pairs([("id", Value::Int(1)), ("region", Value::from("emea"))]);
	let right = RowKey::from_pairs([("id", Value::Int(1)), ("zone", Value::from("emea"))]);
	assert_ne!(left, right, "equal values under different columns differ");
}

#[test]
fn a_positional_key_meets_a_named_one_by_value_order() {
	let named = RowKey::from_pairs([("id", Value::Int(1)), ("region", Value::from("emea"))]);
	let positional = RowKey::from_values([Value::Int(1), Value::from("emea")]);
	assert_eq!(positional, named);

	let swapped = RowKey::from_values([Value::from("emea"), Value::Int(1)]);
	assert_ne!(swapped, named);
}

#[test]
fn lookups_by_name_and_position_agree() {
	let key = RowKey::from_pairs([("id", Value::Int(7)), ("region", Value::from("apac"))]);
	assert_eq!(key.named("region"), key.value(1));
	assert_eq!(key.named("id"), key.value(0));
	assert_eq!(key.named("missing"), None);
	assert_eq!(key.names(), Some(&["id".to_owned(), "region".to_owned()][..]));
}

#[test]
fn a_named_key_round_trips_values_only() {
	let key = RowKey::from_pairs([("id", Value::Int(5)), ("region", Value::from("emea"))]);
	let payload = key.save().expect("non-empty key");

	// Only the values travel; the restoring side supplies the names.
	let State::List(items) = &payload else {
		panic!("expected a value list");
	};
	assert_eq!(items.len(), 2);
	assert!(items.iter().all(|item| matches!(item, State::Value(_))));

	let mut revived = RowKey::from_pairs([("id", Value::Int(0)), ("region", Value::from(""))]);
	revived.restore(&payload).expect("round trip");
	assert_eq!(revived, key);
}

#[test]
fn a_positional_key_round_trips() {
	let key = RowKey::from_values([Value::Int(5), Value::from("emea")]);
	let payload = key.save().expect("non-empty key");
	let mut revived = RowKey::from_values([]);
	revived.restore(&payload).expect("round trip");
	assert_eq!(revived, key);
}

#[test]
fn an_empty_key_saves_nothing() {
	assert_eq!(RowKey::from_values([]).save(), None);
}

#[test]
fn the_wrong_width_is_rejected() {
	let mut key = RowKey::from_pairs([("id", Value::Int(0)), ("region", Value::from(""))]);
	let narrow = State::List(vec![State::Value(Value::Int(5))]);
	assert_eq!(
		key.restore(&narrow),
		Err(MalformedPayload::WrongArity {
			expected: 2,
			found: 1,
		})
	);
}

#[test]
fn extraction_reads_the_declared_columns_in_order() {
	let rows = orders();
	let key = RowKey::extract(&rows[2], &["region", "id"]).expect("both columns exist");
	assert_eq!(key.value(0), Some(&Value::Text("apac".to_owned())));
	assert_eq!(key.value(1), Some(&Value::Int(3)));
}

#[test]
fn extraction_rejects_a_missing_column() {
	let rows = orders();
	assert_eq!(
		RowKey::extract(&rows[0], &["id", "warehouse"]),
		Err(ConfigurationError::MissingKeyColumn("warehouse".to_owned()))
	);
}

#[test]
fn a_key_set_remembers_every_rendered_row() {
	let set = RowKeySet::extract_from(vec!["id".to_owned()], &orders()).expect("extraction");
	assert_eq!(set.len(), 3);
	assert_eq!(set.get(1).unwrap().named("id"), Some(&Value::Int(2)));

	let payload = set.save().expect("non-empty set");
	let mut revived = RowKeySet::named(vec!["id".to_owned()]);
	revived.restore(&payload).expect("round trip");
	assert_eq!(revived, set);

	let ids: Vec<&Value> = revived.iter().map(|key| key.named("id").unwrap()).collect();
	assert_eq!(ids, [&Value::Int(1), &Value::Int(2), &Value::Int(3)]);
}

use serde_json::{json, Value};

/// Saved viewer configurations cycled through by the churn script.
///
/// Configs that carry computed columns get a freshly named computed column on
/// every fetch so that repeated restores cannot be satisfied from any remote
/// cache.
pub fn catalog() -> Vec<Value> {
    base_catalog()
        .into_iter()
        .map(randomize_computed_columns)
        .collect()
}

fn base_catalog() -> Vec<Value> {
    vec![
        json!({
            "row-pivots": ["client"],
            "column-pivots": ["exchange"],
            "columns": ["high", "low", "open", "close"],
            "plugin": "datagrid",
            "sort": [["last_update", "desc"]],
        }),
        json!({
            "row-pivots": ["name"],
            "column-pivots": ["type"],
            "columns": [],
            "computed-columns": [],
            "plugin": "d3_y_bar",
        }),
        json!({
            "row-pivots": ["last_update"],
            "column-pivots": ["type"],
            "columns": [],
            "computed-columns": [],
            "plugin": "d3_ohlc",
            "filters": [["name", "contains", "Y"]],
        }),
    ]
}

fn randomize_computed_columns(mut config: Value) -> Value {
    if let Some(object) = config.as_object_mut() {
        if object.contains_key("computed-columns") {
            let column_name = nanoid::nanoid!(8);
            object.insert(
                "computed-columns".to_string(),
                json!([format!("\"close\" - \"open\" as \"{}\"", column_name)]),
            );

            if let Some(columns) = object.get_mut("columns").and_then(Value::as_array_mut) {
                columns.push(json!(column_name));
            }
        }
    }

    config
}

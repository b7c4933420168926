use database_layer::{Child, FoodEntry};
use serde::Serialize;

/// A child together with its food entries, newest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildDetail {
    #[serde(flatten)]
    pub child: Child,
    pub food_entries: Vec<FoodEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn test_detail_flattens_child_fields() {
        let child = Child::new(Uuid::new_v4(), "Ada", NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        let detail = ChildDetail {
            child: child.clone(),
            food_entries: Vec::new(),
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], child.id.to_string());
        assert_eq!(json["name"], "Ada");
        assert!(json["foodEntries"].as_array().unwrap().is_empty());
    }
}

use serde::Deserialize;

/// The trivia frontend is loose about numbers: question ids and category ids
/// show up as JSON numbers or as strings depending on the screen. Accept both.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "IdRepr")]
pub struct LooseId(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
pub enum IdRepr {
    Num(i64),
    Str(String),
}

impl TryFrom<IdRepr> for LooseId {
    type Error = String;

    fn try_from(value: IdRepr) -> Result<Self, Self::Error> {
        match value {
            IdRepr::Num(v) => Ok(LooseId(v)),
            IdRepr::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(LooseId(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}

/// The `category` field of a new question arrives as either a string or a
/// number; it is stored as text either way.
pub fn deserialize_opt_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<IdRepr>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        IdRepr::Num(n) => n.to_string(),
        IdRepr::Str(s) => s,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_id_accepts_numbers_and_strings() {
        let id: LooseId = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(id, LooseId(5));
        let id: LooseId = serde_json::from_value(json!("25")).unwrap();
        assert_eq!(id, LooseId(25));
    }

    #[test]
    fn loose_id_rejects_garbage() {
        assert!(serde_json::from_value::<LooseId>(json!("five")).is_err());
        assert!(serde_json::from_value::<LooseId>(json!([1])).is_err());
    }
}

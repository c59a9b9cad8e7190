use std::fmt;

/// Object-store provider behind a connection.
///
/// Derived from the connector segment of a connection qualified name, e.g.
/// `default/s3/1672502400` is [`ConnectorType::S3`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConnectorType {
    S3,
    Gcs,
    Adls,
    /// Any connector that is not an object store, or an unparseable qualified name.
    Other(String),
}

impl ConnectorType {
    /// Derive the connector type from a connection qualified name.
    pub fn from_qualified_name(connection_qualified_name: &str) -> Self {
        let segment = connection_qualified_name.split('/').nth(1).unwrap_or("");
        ConnectorType::from(segment)
    }

    /// Value used for this connector inside qualified names.
    pub fn as_str(&self) -> &str {
        match self {
            ConnectorType::S3 => "s3",
            ConnectorType::Gcs => "gcs",
            ConnectorType::Adls => "adls",
            ConnectorType::Other(other) => other.as_str(),
        }
    }
}

impl From<&str> for ConnectorType {
    fn from(s: &str) -> Self {
        let connector = s.trim().to_ascii_lowercase();
        match connector.as_str() {
            "s3" => ConnectorType::S3,
            "gcs" => ConnectorType::Gcs,
            "adls" => ConnectorType::Adls,
            _ => ConnectorType::Other(connector),
        }
    }
}

impl fmt::Display for ConnectorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorType::Other(other) if other.is_empty() => write!(f, "<none>"),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_object_store_connectors_from_qualified_names() {
        let cases = [
            ("default/s3/1672502400", ConnectorType::S3),
            ("default/gcs/123", ConnectorType::Gcs),
            ("default/adls/123", ConnectorType::Adls),
            ("default/ADLS/123", ConnectorType::Adls),
            ("default/snowflake/99", ConnectorType::Other("snowflake".into())),
            ("default", ConnectorType::Other(String::new())),
            ("", ConnectorType::Other(String::new())),
        ];
        for (qualified_name, expected) in cases {
            assert_eq!(
                ConnectorType::from_qualified_name(qualified_name),
                expected,
                "qualified name {qualified_name:?}"
            );
        }
    }

    #[test]
    fn other_connectors_compare_case_insensitively() {
        assert_eq!(
            ConnectorType::from("Snowflake"),
            ConnectorType::from(" snowflake ")
        );
        assert_eq!(
            ConnectorType::from_qualified_name("default/Snowflake/99"),
            ConnectorType::Other("snowflake".into())
        );
    }

    #[test]
    fn displays_missing_connector_as_none() {
        assert_eq!(ConnectorType::Other(String::new()).to_string(), "<none>");
        assert_eq!(ConnectorType::Gcs.to_string(), "gcs");
    }
}

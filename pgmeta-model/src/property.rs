use pgmeta_catalog::Oid;
use semistr::SemiStr;
use std::fmt;

/// Value of one displayed property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Oid(Oid),
    List(Vec<String>),
}

impl PropertyValue {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Text(s) => f.write_str(s),
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Float(v) => write!(f, "{}", v),
            PropertyValue::Oid(oid) => write!(f, "{}", oid),
            PropertyValue::List(items) => f.write_str(&items.join(", ")),
        }
    }
}

impl From<&str> for PropertyValue {
    #[inline]
    fn from(src: &str) -> Self {
        PropertyValue::Text(src.to_string())
    }
}

impl From<&SemiStr> for PropertyValue {
    #[inline]
    fn from(src: &SemiStr) -> Self {
        PropertyValue::Text(src.as_str().to_string())
    }
}

impl From<bool> for PropertyValue {
    #[inline]
    fn from(src: bool) -> Self {
        PropertyValue::Bool(src)
    }
}

impl From<i64> for PropertyValue {
    #[inline]
    fn from(src: i64) -> Self {
        PropertyValue::Int(src)
    }
}

impl From<f64> for PropertyValue {
    #[inline]
    fn from(src: f64) -> Self {
        PropertyValue::Float(src)
    }
}

impl From<&[String]> for PropertyValue {
    #[inline]
    fn from(src: &[String]) -> Self {
        PropertyValue::List(src.to_vec())
    }
}

impl<T: Into<PropertyValue>> From<Option<T>> for PropertyValue {
    #[inline]
    fn from(src: Option<T>) -> Self {
        src.map_or(PropertyValue::Null, Into::into)
    }
}

/// Named field of an object with display order and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub id: &'static str,
    pub label: &'static str,
    pub order: u16,
    pub viewable: bool,
    pub value: PropertyValue,
}

impl Property {
    #[inline]
    pub fn new(
        id: &'static str,
        label: &'static str,
        order: u16,
        value: impl Into<PropertyValue>,
    ) -> Self {
        Property {
            id,
            label,
            order,
            viewable: true,
            value: value.into(),
        }
    }

    /// Oids are kept as properties but not shown by default.
    #[inline]
    pub fn oid(id: &'static str, label: &'static str, order: u16, oid: Oid) -> Self {
        Property {
            id,
            label,
            order,
            viewable: false,
            value: PropertyValue::Oid(oid),
        }
    }

    #[inline]
    pub fn hidden(mut self) -> Self {
        self.viewable = false;
        self
    }
}

/// Objects describing themselves as an ordered property list.
pub trait PropertySource {
    /// All properties, hidden ones included.
    fn properties(&self) -> Vec<Property>;

    #[inline]
    fn property(&self, id: &str) -> Option<Property> {
        self.properties().into_iter().find(|p| p.id == id)
    }

    /// Viewable properties sorted by display order.
    #[inline]
    fn viewable_properties(&self) -> Vec<Property> {
        let mut props: Vec<_> = self
            .properties()
            .into_iter()
            .filter(|p| p.viewable)
            .collect();
        props.sort_by_key(|p| p.order);
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample;

    impl PropertySource for Sample {
        fn properties(&self) -> Vec<Property> {
            vec![
                Property::new("owner", "Owner", 3, Some("alice")),
                Property::oid("oid", "OID", 1, 16384),
                Property::new("name", "Name", 2, "orders"),
                Property::new("comment", "Comment", 10, None::<&str>),
            ]
        }
    }

    #[test]
    fn test_viewable_properties() {
        let props = Sample.viewable_properties();
        let ids: Vec<_> = props.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["name", "owner", "comment"]);
        assert!(props[2].value.is_null());
        assert_eq!(Sample.property("oid").unwrap().value, PropertyValue::Oid(16384));
        assert_eq!(Sample.property("owner").unwrap().value.to_string(), "alice");
        assert!(Sample.property("missing").is_none());
    }
}

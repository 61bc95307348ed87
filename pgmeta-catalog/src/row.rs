use crate::{INVALID_OID, Oid};
use indexmap::IndexMap;
use semistr::SemiStr;

/// One row returned by a catalog query.
///
/// Values are kept in text form as the server sends them.
/// NULL is `None` and must never be confused with empty text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cols: IndexMap<SemiStr, Option<String>>,
}

impl Row {
    #[inline]
    pub fn new() -> Self {
        Row::default()
    }

    /// Builder style helper to add a non-null column.
    #[inline]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.push(name, Some(value.into()));
        self
    }

    /// Builder style helper to add a null column.
    #[inline]
    pub fn with_null(mut self, name: &str) -> Self {
        self.push(name, None);
        self
    }

    #[inline]
    pub fn push(&mut self, name: &str, value: Option<String>) {
        self.cols.insert(SemiStr::new(name), value);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    #[inline]
    pub fn has_column(&self, name: &str) -> bool {
        self.cols.contains_key(name)
    }

    #[inline]
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cols.keys().map(|k| k.as_str())
    }

    /// True if column is missing or null.
    #[inline]
    pub fn is_null(&self, name: &str) -> bool {
        self.str(name).is_none()
    }

    #[inline]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.cols.get(name).and_then(|v| v.as_deref())
    }

    /// Non-null, non-empty text.
    #[inline]
    pub fn non_empty_str(&self, name: &str) -> Option<&str> {
        self.str(name).filter(|s| !s.is_empty())
    }

    #[inline]
    pub fn string(&self, name: &str) -> Option<String> {
        self.str(name).map(String::from)
    }

    #[inline]
    pub fn semistr(&self, name: &str) -> Option<SemiStr> {
        self.str(name).map(SemiStr::new)
    }

    /// Oid column, `INVALID_OID` if null or not a number.
    #[inline]
    pub fn oid(&self, name: &str) -> Oid {
        self.str(name)
            .and_then(|s| s.trim().parse::<Oid>().ok())
            .unwrap_or(INVALID_OID)
    }

    #[inline]
    pub fn i64(&self, name: &str) -> Option<i64> {
        self.str(name).and_then(|s| s.trim().parse::<i64>().ok())
    }

    #[inline]
    pub fn f64(&self, name: &str) -> Option<f64> {
        self.str(name).and_then(|s| s.trim().parse::<f64>().ok())
    }

    /// Boolean column accepting the server text forms
    /// (`t`/`f`, `true`/`false`, `YES`/`NO` of information_schema).
    #[inline]
    pub fn bool(&self, name: &str) -> Option<bool> {
        let s = self.str(name)?;
        match s.trim() {
            v if v.eq_ignore_ascii_case("t")
                || v.eq_ignore_ascii_case("true")
                || v.eq_ignore_ascii_case("yes")
                || v == "1" =>
            {
                Some(true)
            }
            v if v.eq_ignore_ascii_case("f")
                || v.eq_ignore_ascii_case("false")
                || v.eq_ignore_ascii_case("no")
                || v == "0" =>
            {
                Some(false)
            }
            _ => None,
        }
    }

    /// Boolean column where null and missing mean false.
    #[inline]
    pub fn flag(&self, name: &str) -> bool {
        self.bool(name).unwrap_or(false)
    }

    /// Single character column such as `relkind` or `prokind`.
    #[inline]
    pub fn char(&self, name: &str) -> Option<char> {
        let s = self.str(name)?;
        let mut chars = s.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Some(c)
    }

    /// Text array column, e.g. `relacl` or `srvoptions`.
    /// Null elements are dropped.
    #[inline]
    pub fn text_array(&self, name: &str) -> Option<Vec<String>> {
        self.str(name).map(parse_text_array)
    }
}

/// Parse the external text form of a one-dimensional array:
/// `{a,"b c",NULL,"d\"e"}`.
pub fn parse_text_array(input: &str) -> Vec<String> {
    let s = input.trim();
    let inner = match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        Some(inner) => inner,
        // not an array literal, treat as single element.
        None if s.is_empty() => return vec![],
        None => return vec![s.to_string()],
    };
    let mut res = vec![];
    let mut chars = inner.chars().peekable();
    loop {
        // skip leading whitespaces
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };
        if first == '"' {
            chars.next();
            let mut elem = String::new();
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            elem.push(escaped);
                        }
                    }
                    '"' => break,
                    _ => elem.push(c),
                }
            }
            res.push(elem);
            // consume until separator
            for c in chars.by_ref() {
                if c == ',' {
                    break;
                }
            }
        } else {
            let mut elem = String::new();
            for c in chars.by_ref() {
                if c == ',' {
                    break;
                }
                elem.push(c);
            }
            let elem = elem.trim_end();
            if !elem.eq_ignore_ascii_case("NULL") {
                res.push(elem.to_string());
            }
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_null_vs_empty() {
        let row = Row::new().with("a", "").with_null("b");
        assert_eq!(row.str("a"), Some(""));
        assert_eq!(row.str("b"), None);
        assert_eq!(row.str("c"), None);
        assert!(row.has_column("b"));
        assert!(!row.has_column("c"));
        assert!(row.non_empty_str("a").is_none());
    }

    #[test]
    fn test_row_typed_values() {
        let row = Row::new()
            .with("oid", "16384")
            .with("bad_oid", "abc")
            .with("flag", "t")
            .with("grantable", "YES")
            .with("kind", "r")
            .with("kinds", "rv")
            .with("num", "-5");
        assert_eq!(row.oid("oid"), 16384);
        assert_eq!(row.oid("bad_oid"), INVALID_OID);
        assert_eq!(row.oid("missing"), INVALID_OID);
        assert_eq!(row.bool("flag"), Some(true));
        assert_eq!(row.bool("grantable"), Some(true));
        assert!(!row.flag("missing"));
        assert_eq!(row.char("kind"), Some('r'));
        assert_eq!(row.char("kinds"), None);
        assert_eq!(row.i64("num"), Some(-5));
    }

    #[test]
    fn test_parse_text_array() {
        assert!(parse_text_array("{}").is_empty());
        assert_eq!(parse_text_array("{a,b}"), vec!["a", "b"]);
        assert_eq!(
            parse_text_array(r#"{"host=db one",port=5432,NULL}"#),
            vec!["host=db one", "port=5432"]
        );
        assert_eq!(
            parse_text_array(r#"{"\"my role\"=r/postgres",=U/postgres}"#),
            vec![r#""my role"=r/postgres"#, "=U/postgres"]
        );
        assert_eq!(parse_text_array("single"), vec!["single"]);
    }
}

use crate::context::MetaContext;
use crate::privilege_owner::PrivilegeOwner;
use pgmeta_catalog::ObjectKind;
use pgmeta_catalog::ident::quote_literal;
use pgmeta_privilege::sql::permission_statements;

/// Objects that can reconstruct their defining SQL.
///
/// Output is best effort plain text and is never parsed back.
pub trait ObjectDdl {
    fn ddl(&self, ctx: &MetaContext) -> String;
}

/// Accumulates statements and comment lines of one DDL script.
#[derive(Debug, Default)]
pub struct DdlBuilder {
    out: String,
}

impl DdlBuilder {
    #[inline]
    pub fn new() -> Self {
        DdlBuilder::default()
    }

    #[inline]
    pub fn statement(&mut self, sql: impl AsRef<str>) -> &mut Self {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(sql.as_ref());
        self.out.push(';');
        self
    }

    #[inline]
    pub fn comment(&mut self, text: &str) -> &mut Self {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str("-- ");
        self.out.push_str(text);
        self
    }

    /// `COMMENT ON` when comments are enabled and the object has one.
    #[inline]
    pub fn object_comment(
        &mut self,
        ctx: &MetaContext,
        kind: ObjectKind,
        name: &str,
        description: Option<&str>,
    ) -> &mut Self {
        match description {
            Some(text) if ctx.config().ddl.show_comments && !text.is_empty() => self.statement(
                format!(
                    "COMMENT ON {} {} IS {}",
                    kind.sql_keyword(),
                    name,
                    quote_literal(text)
                ),
            ),
            _ => self,
        }
    }

    /// Owner change and GRANT statements when permissions are enabled.
    pub fn permissions<T: PrivilegeOwner + ?Sized>(
        &mut self,
        ctx: &MetaContext,
        object: &T,
    ) -> &mut Self {
        if !ctx.config().ddl.show_permissions {
            return self;
        }
        self.comment("Permissions");
        if let Some(owner) = object.owner_name() {
            self.statement(object.change_owner_sql(owner));
        }
        let kind = object.object_kind();
        let name = object.sql_name();
        for perm in object.permissions(ctx.database_name()) {
            for sql in permission_statements(kind, &name, &perm) {
                self.statement(sql);
            }
        }
        self
    }

    #[inline]
    pub fn finish(&mut self) -> String {
        std::mem::take(&mut self.out)
    }
}

/// `IF NOT EXISTS ` prefix when enabled.
#[inline]
pub fn if_not_exists(ctx: &MetaContext) -> &'static str {
    if ctx.config().ddl.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    }
}

/// Render `key=value` options as `(key 'value', ...)`.
/// Items without `=` are kept verbatim.
pub fn options_clause(options: &[String]) -> String {
    let items: Vec<String> = options
        .iter()
        .map(|opt| match opt.split_once('=') {
            Some((key, value)) => format!("{} {}", key, quote_literal(value)),
            None => opt.clone(),
        })
        .collect();
    format!("({})", items.join(", "))
}

/// Render `key=value` options as `WITH (key=value, ...)`, or nothing
/// when there are no options.
pub fn with_clause(options: &[String]) -> String {
    if options.is_empty() {
        return String::new();
    }
    format!("WITH ({})", options.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_clause() {
        let opts = vec![
            String::from("host=10.0.0.5"),
            String::from("dbname=o'brien"),
            String::from("updatable"),
        ];
        assert_eq!(
            options_clause(&opts),
            "(host '10.0.0.5', dbname 'o''brien', updatable)"
        );
        assert_eq!(options_clause(&[]), "()");
    }

    #[test]
    fn test_with_clause() {
        let opts = vec![
            String::from("seq_page_cost=0.5"),
            String::from("random_page_cost=1.1"),
        ];
        assert_eq!(
            with_clause(&opts),
            "WITH (seq_page_cost=0.5, random_page_cost=1.1)"
        );
        assert_eq!(with_clause(&[]), "");
    }

    #[test]
    fn test_ddl_builder() {
        let mut b = DdlBuilder::new();
        b.statement("CREATE SCHEMA sales").comment("Permissions");
        b.statement("GRANT USAGE ON SCHEMA sales TO bob");
        assert_eq!(
            b.finish(),
            "CREATE SCHEMA sales;\n-- Permissions\nGRANT USAGE ON SCHEMA sales TO bob;"
        );
    }
}

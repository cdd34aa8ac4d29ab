//! DDL statement templates: immutable values rewritten per physical
//! location and rendered to canonical text.
//!
//! The parsed CREATE TABLE arrives from the SQL frontend as an immutable
//! template. Rewriting for a data node produces a *new* value rather than
//! mutating a shared AST, so concurrent tasks never alias each other.

use meshgate_common::error::{MeshgateError, MeshgateResult};

use crate::catalog::DataNode;

/// A parsed CREATE TABLE statement, reduced to the fields the fan-out core
/// rewrites and renders. `body` is the column/constraint list as rendered
/// by the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableTemplate {
    pub schema: Option<String>,
    pub table: String,
    pub if_not_exists: bool,
    pub body: String,
}

impl CreateTableTemplate {
    pub fn new(
        schema: Option<String>,
        table: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        CreateTableTemplate {
            schema,
            table: table.into(),
            if_not_exists: false,
            body: body.into(),
        }
    }

    fn with_table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.to_string());
        self
    }

    /// Derive the statement for one physical location: force idempotent
    /// IF NOT EXISTS semantics, then set the table name, then the schema
    /// name. The table/schema order is load-bearing: the table setter
    /// reads the qualifier state left by prior rewrites.
    ///
    /// A rewritten statement whose names do not exactly equal the data
    /// node's is an internal invariant violation, never a user error.
    pub fn rewrite_for(&self, node: &DataNode) -> MeshgateResult<CreateTableTemplate> {
        let mut rewritten = self.clone();
        rewritten.if_not_exists = true;
        rewritten = rewritten.with_table(&node.table).with_schema(&node.schema);

        if rewritten.table != node.table {
            return Err(MeshgateError::internal_invariant(
                "E-REWRITE-001",
                "rewritten table name diverged from data node",
                format!("node={}.{}, rewritten={}", node.schema, node.table, rewritten.table),
            ));
        }
        if rewritten.schema.as_deref() != Some(node.schema.as_str()) {
            return Err(MeshgateError::internal_invariant(
                "E-REWRITE-002",
                "rewritten schema name diverged from data node",
                format!(
                    "node={}.{}, rewritten={:?}",
                    node.schema, node.table, rewritten.schema
                ),
            ));
        }
        Ok(rewritten)
    }

    /// Render to canonical text. Byte-identical renders across data nodes
    /// collapse into one statement task.
    pub fn render(&self) -> String {
        let mut sql = String::from("CREATE TABLE ");
        if self.if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        if let Some(schema) = &self.schema {
            sql.push_str(&format!("\"{}\".", schema));
        }
        sql.push_str(&format!("\"{}\" ({})", self.table, self.body));
        sql
    }
}

/// Phase-1 statement: make sure a physical schema exists on a datasource
/// before its tables are created there.
pub fn ensure_schema_statement(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\"")
}

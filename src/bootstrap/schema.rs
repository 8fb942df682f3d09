//! 数据库模式定义
//! 同一份 DDL 同时适用于 SQLite 和 PostgreSQL

/// 表定义
#[derive(Debug, Clone, Copy)]
pub struct TableDef {
    pub name: &'static str,
    pub create_sql: &'static str,
}

/// 应用的全部表，按创建顺序排列（删除时逆序）
pub const TABLES: &[TableDef] = &[
    TableDef {
        name: "users",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
        "#,
    },
    TableDef {
        name: "products",
        create_sql: r#"
            CREATE TABLE IF NOT EXISTS products (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                retail_price DOUBLE PRECISION NOT NULL,
                wholesale_price DOUBLE PRECISION NOT NULL,
                category TEXT NOT NULL,
                stock BIGINT NOT NULL,
                pic_url TEXT NOT NULL
            )
        "#,
    },
];

/// 删除表的语句（逆序）
pub fn drop_statements() -> Vec<String> {
    TABLES
        .iter()
        .rev()
        .map(|table| format!("DROP TABLE IF EXISTS {}", table.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_is_idempotent_to_create() {
        for table in TABLES {
            assert!(table.create_sql.contains("CREATE TABLE IF NOT EXISTS"));
            assert!(table.create_sql.contains(table.name));
        }
    }

    #[test]
    fn test_drop_order_is_reverse_of_create() {
        let drops = drop_statements();
        assert_eq!(drops.len(), TABLES.len());
        assert_eq!(drops[0], "DROP TABLE IF EXISTS products");
        assert_eq!(drops[drops.len() - 1], "DROP TABLE IF EXISTS users");
    }
}

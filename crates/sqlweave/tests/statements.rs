use sqlweave::{
    Builder, ClauseKeyword, CompilerConfig, KeywordClauses, Predicate, QueryType, Scalar,
    TableRef, Value, compile_clause, quote_literal,
};

#[test]
fn select_star() {
    let mut qb = Builder::new();
    qb.select(["users"], "*", KeywordClauses::new()).unwrap();
    assert_eq!(qb.compile(), "SELECT * FROM users");
}

#[test]
fn clause_compiles_once() {
    let config = CompilerConfig::default();
    let mut where_ = vec![
        Predicate::new("age", 18).op(">="),
        Predicate::new("status", "active").connector("AND"),
    ];

    let first = compile_clause(ClauseKeyword::Where, &mut where_, &config).unwrap();
    assert_eq!(first.to_sql(), " WHERE age >= 18 AND status = 'active'");

    let second = compile_clause(ClauseKeyword::Where, &mut where_, &config).unwrap();
    assert!(second.is_empty());
}

#[test]
fn union_all_concatenates_selects() {
    let mut qb = Builder::new();
    qb.select("a", "id", KeywordClauses::new()).unwrap();
    qb.union(true).unwrap();
    qb.select("b", "id", KeywordClauses::new()).unwrap();
    assert_eq!(qb.compile(), "SELECT id FROM a UNION ALL SELECT id FROM b");

    // The continuation is spent; the next select starts over.
    qb.select("c", "id", KeywordClauses::new()).unwrap();
    assert_eq!(qb.compile(), "SELECT id FROM c");
}

#[test]
fn drop_kinds() {
    let mut qb = Builder::new();
    assert!(qb.drop("x", "blob").unwrap_err().is_invalid_argument());
    qb.drop("x", "table").unwrap();
    assert_eq!(qb.compile(), "DROP TABLE x");
    qb.drop("shop", "DATABASE").unwrap();
    assert_eq!(qb.compile(), "DROP DATABASE shop");
    assert_eq!(qb.query_type(), Some(QueryType::Raw));
}

#[test]
fn unquoted_scalars_render_unchanged() {
    let mut qb = Builder::new();
    qb.auto_quote_values(false);
    qb.filter([
        Predicate::new("name", "bob"),
        Predicate::new("score", 1.5).op(">"),
        Predicate::in_list("tag", ["a", "b"]),
    ]);
    qb.select("players", "*", KeywordClauses::new()).unwrap();
    assert_eq!(
        qb.compile(),
        "SELECT * FROM players WHERE name = bob AND score > 1.5 AND tag IN (a,b)"
    );
}

#[test]
fn report_with_nested_sub_queries() {
    let root = Builder::new();

    let mut big_spenders = root.sub_query();
    big_spenders.having([Predicate::new("SUM(total)", 1000).op(">=")]);
    big_spenders
        .select(
            "orders",
            "user_id",
            KeywordClauses::new().group_by("user_id"),
        )
        .unwrap();

    let mut active = root.sub_query();
    active.filter([
        Predicate::new("status", "active"),
        Predicate::new("id", &big_spenders).op("IN"),
    ]);
    active.select("users", ["id", "name"], KeywordClauses::new()).unwrap();

    let mut qb = root;
    qb.select(
        TableRef::sub(&active, "u"),
        "u.name",
        KeywordClauses::new().order_by("u.name"),
    )
    .unwrap();

    assert_eq!(
        qb.compile(),
        "SELECT u.name FROM (SELECT id,name FROM users WHERE status = 'active' AND id IN \
         (SELECT user_id FROM orders GROUP BY user_id HAVING SUM(total) >= 1000)) AS u ORDER BY u.name"
    );
}

#[test]
fn insert_from_select() {
    let mut source = Builder::new();
    source.filter([Predicate::is_not_null("email")]);
    source.select("signups", ["name", "email"], KeywordClauses::new()).unwrap();

    let mut qb = Builder::new();
    qb.insert("users", &source, ["name", "email"]);
    assert_eq!(
        qb.compile(),
        "INSERT INTO users(name,email) SELECT name,email FROM signups WHERE email IS NOT NULL"
    );
}

#[test]
fn view_over_union() {
    let mut qb = Builder::new();
    qb.create_view("people", false);
    qb.select("staff", "name", KeywordClauses::new()).unwrap();
    qb.union(false).unwrap();
    qb.select("contractors", "name", KeywordClauses::new()).unwrap();
    assert_eq!(
        qb.compile(),
        "CREATE VIEW people AS SELECT name FROM staff UNION SELECT name FROM contractors"
    );
}

#[test]
fn raw_after_statement() {
    let mut qb = Builder::new();
    qb.select("users", "*", KeywordClauses::new()).unwrap();
    qb.raw(" FOR UPDATE");
    assert_eq!(qb.compile(), "SELECT * FROM users FOR UPDATE");
    assert_eq!(qb.query_type(), Some(QueryType::Raw));
}

#[test]
fn literal_quoting() {
    assert_eq!(quote_literal(&Scalar::Int(-4), false), "-4");
    assert_eq!(quote_literal(&Scalar::Float(0.25), false), "'0.25'");
    assert_eq!(quote_literal(&Scalar::from("it's"), false), "'it's'");
    assert_eq!(quote_literal(&Scalar::from("it's"), true), "'it''s'");
}

#[test]
fn update_with_placeholders() {
    let mut qb = Builder::new();
    qb.filter([Predicate::new("id", "?")]);
    qb.update(
        "users",
        vec![("name", Value::Placeholder), ("visits", Value::from(0))],
        None,
    )
    .unwrap();
    assert_eq!(qb.compile(), "UPDATE users SET name=?,visits=0 WHERE id = ?");
}

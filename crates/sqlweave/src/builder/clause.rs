//! WHERE / HAVING clause compiler shared by SELECT, UPDATE and DELETE.

use super::predicate::{Operator, Predicate};
use crate::config::CompilerConfig;
use crate::error::{SqlError, SqlResult};
use crate::sql::Sql;
use crate::value::{Quoter, Value};

/// Keyword that opens a predicate clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKeyword {
    Where,
    Having,
}

impl ClauseKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            ClauseKeyword::Where => "WHERE",
            ClauseKeyword::Having => "HAVING",
        }
    }
}

/// Compile a predicate list and consume it.
///
/// The returned fragment starts with a space (` WHERE ...`) so it can be
/// appended directly; it is empty when the list is empty. The list is
/// cleared only when compilation succeeds, so compiling the same list twice
/// yields an empty second clause.
pub fn compile_clause(
    keyword: ClauseKeyword,
    predicates: &mut Vec<Predicate>,
    config: &CompilerConfig,
) -> SqlResult<Sql> {
    let sql = render_clause(keyword, predicates, config)?;
    predicates.clear();
    Ok(sql)
}

/// Compile a predicate list without consuming it.
pub fn render_clause(
    keyword: ClauseKeyword,
    predicates: &[Predicate],
    config: &CompilerConfig,
) -> SqlResult<Sql> {
    if predicates.is_empty() {
        return Ok(Sql::empty());
    }

    let quoter = Quoter::new(config);
    let mut fragments = Vec::with_capacity(predicates.len());

    for (position, predicate) in predicates.iter().enumerate() {
        let mut fragment = if position == 0 {
            Sql::new(keyword.as_str())
        } else {
            Sql::new(predicate.resolved_connector()?.as_str())
        };
        fragment.push(" ");
        fragment.append(&render_predicate(predicate, &quoter)?);
        fragments.push(fragment);
    }

    let mut clause = Sql::new(" ");
    clause.append(&Sql::join(&fragments, " "));
    Ok(clause)
}

fn render_predicate(predicate: &Predicate, quoter: &Quoter<'_>) -> SqlResult<Sql> {
    let op = &predicate.operator;
    let mut sql = Sql::new(&predicate.expression);

    match op {
        Operator::Between | Operator::NotBetween => {
            if !matches!(&predicate.value, Value::List(items) if items.len() == 2) {
                return Err(SqlError::invalid_argument(format!(
                    "{} on '{}' expects a list of exactly two values",
                    op, predicate.expression
                )));
            }
            let bounds = quoter.list(&predicate.value);
            sql.push(" ").push(op.as_str()).push(" ");
            sql.append(&Sql::join(&bounds, " AND "));
        }
        Operator::In | Operator::NotIn => match &predicate.value {
            // Nothing can match an empty IN list, everything matches an empty NOT IN list.
            Value::List(items) if items.is_empty() => {
                let always = if *op == Operator::In { "1=0" } else { "1=1" };
                return Ok(Sql::new(always));
            }
            Value::SubExpression(sub) => {
                sql.push(" ").push(op.as_str()).push(" ");
                sql.append(&sub.parenthesized());
            }
            value => {
                sql.push(" ").push(op.as_str()).push(" ");
                sql.append_parenthesized(&quoter.joined(value));
            }
        },
        Operator::IsNull | Operator::IsNotNull => {
            sql.push(" ").push(op.as_str());
        }
        _ => {
            if predicate.value.is_empty() {
                return Err(SqlError::invalid_argument(format!(
                    "{} on '{}' needs a value",
                    op, predicate.expression
                )));
            }
            sql.push(" ").push(op.as_str()).push(" ");
            sql.append(&quoter.joined(&predicate.value));
        }
    }

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(predicates: &mut Vec<Predicate>) -> SqlResult<String> {
        compile_clause(ClauseKeyword::Where, predicates, &CompilerConfig::default())
            .map(|sql| sql.to_sql())
    }

    #[test]
    fn test_first_predicate_carries_keyword() {
        let mut preds = vec![Predicate::new("id", 5)];
        assert_eq!(compile(&mut preds).unwrap(), " WHERE id = 5");
    }

    #[test]
    fn test_default_connector_is_and() {
        let mut preds = vec![
            Predicate::new("age", 18).op(">="),
            Predicate::new("status", "active").connector("AND"),
        ];
        assert_eq!(
            compile(&mut preds).unwrap(),
            " WHERE age >= 18 AND status = 'active'"
        );
    }

    #[test]
    fn test_connector_is_case_insensitive() {
        let mut preds = vec![
            Predicate::new("role", "admin"),
            Predicate::new("role", "owner").connector("or"),
        ];
        assert_eq!(
            compile(&mut preds).unwrap(),
            " WHERE role = 'admin' OR role = 'owner'"
        );
    }

    #[test]
    fn test_first_connector_is_ignored() {
        let mut preds = vec![Predicate::new("id", 1).connector("XOR")];
        assert_eq!(compile(&mut preds).unwrap(), " WHERE id = 1");
    }

    #[test]
    fn test_invalid_connector_rejected_and_list_kept() {
        let mut preds = vec![
            Predicate::new("a", 1),
            Predicate::new("b", 2).connector("XOR"),
        ];
        let err = compile(&mut preds).unwrap_err();
        assert!(err.is_invalid_argument());
        assert_eq!(preds.len(), 2);
    }

    #[test]
    fn test_one_shot_consumption() {
        let mut preds = vec![Predicate::new("id", 5)];
        assert_eq!(compile(&mut preds).unwrap(), " WHERE id = 5");
        assert_eq!(compile(&mut preds).unwrap(), "");
    }

    #[test]
    fn test_operator_is_normalized() {
        let mut preds = vec![Predicate::new("name", "a%").op("  like ")];
        assert_eq!(compile(&mut preds).unwrap(), " WHERE name LIKE 'a%'");
    }

    #[test]
    fn test_between() {
        let mut preds = vec![
            Predicate::between("amount", 100, 500),
            Predicate::not_between("created", "2024-01-01", "2024-02-01"),
        ];
        assert_eq!(
            compile(&mut preds).unwrap(),
            " WHERE amount BETWEEN 100 AND 500 AND created NOT BETWEEN '2024-01-01' AND '2024-02-01'"
        );
    }

    #[test]
    fn test_between_requires_two_values() {
        let mut preds = vec![Predicate::new("amount", 100).op("BETWEEN")];
        assert!(compile(&mut preds).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_comparison_requires_value() {
        let mut preds = vec![Predicate::new("id", Vec::<i32>::new())];
        assert!(compile(&mut preds).unwrap_err().is_invalid_argument());
        assert_eq!(preds.len(), 1);

        let mut preds = vec![Predicate::new("name", Vec::<&str>::new()).op("LIKE")];
        assert!(compile(&mut preds).unwrap_err().is_invalid_argument());
    }

    #[test]
    fn test_in_and_not_in() {
        let mut preds = vec![
            Predicate::in_list("role_id", [1, 2, 3]),
            Predicate::not_in("name", ["x", "y"]),
        ];
        assert_eq!(
            compile(&mut preds).unwrap(),
            " WHERE role_id IN (1,2,3) AND name NOT IN ('x','y')"
        );
    }

    #[test]
    fn test_empty_in_lists() {
        let mut preds = vec![
            Predicate::in_list("id", Vec::<i32>::new()),
            Predicate::not_in("id", Vec::<i32>::new()),
        ];
        assert_eq!(compile(&mut preds).unwrap(), " WHERE 1=0 AND 1=1");
    }

    #[test]
    fn test_null_checks_render_no_value() {
        let mut preds = vec![
            Predicate::is_null("deleted_at"),
            Predicate::is_not_null("email").or(),
        ];
        assert_eq!(
            compile(&mut preds).unwrap(),
            " WHERE deleted_at IS NULL OR email IS NOT NULL"
        );
    }

    #[test]
    fn test_having_keyword() {
        let mut preds = vec![Predicate::new("COUNT(*)", 5).op(">")];
        let sql = compile_clause(ClauseKeyword::Having, &mut preds, &CompilerConfig::default())
            .unwrap();
        assert_eq!(sql.to_sql(), " HAVING COUNT(*) > 5");
    }
}

use sqlx::{Encode, Postgres, QueryBuilder, Type};

/// Append `AND <column> = $n` when the filter value is present.
///
/// Builders start from `... WHERE TRUE` so every condition can be appended
/// the same way. `column` is pushed verbatim and must be a trusted literal.
pub fn and_eq<'args, T>(qb: &mut QueryBuilder<'args, Postgres>, column: &'static str, value: Option<T>)
where
    T: 'args + Encode<'args, Postgres> + Type<Postgres> + Send,
{
    if let Some(value) = value {
        qb.push(" AND ").push(column).push(" = ").push_bind(value);
    }
}

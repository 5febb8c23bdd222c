/// MySQL Driver
///
/// Backend built on the `mysql` crate. Statements go through the binary
/// (prepared statement) protocol, so numeric columns come back typed.

use crate::core::{FacadeError, Result};
use ::mysql::prelude::Queryable;
use ::mysql::{Conn, OptsBuilder, Params};
use tracing::info;

use super::session::{ConnectionInfo, Driver, Session};
use super::value::{Row, Value};

const DEFAULT_PORT: u16 = 3306;

/// Opens sessions against a MySQL-compatible server.
#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDriver;

impl MysqlDriver {
    /// Checks the target before any network round trip
    fn validate(target: &ConnectionInfo) -> Result<()> {
        for (field, value) in [
            ("host", &target.host),
            ("user", &target.user),
            ("database", &target.database),
        ] {
            if value.is_empty() {
                return Err(FacadeError::Connection(format!("{} must not be empty", field)));
            }
        }
        Ok(())
    }
}

impl Driver for MysqlDriver {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn open(&self, target: &ConnectionInfo) -> Result<Box<dyn Session>> {
        MysqlDriver::validate(target)?;

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(target.host.clone()))
            .tcp_port(target.port.unwrap_or(DEFAULT_PORT))
            .user(Some(target.user.clone()))
            .pass(Some(target.password.clone()))
            .db_name(Some(target.database.clone()))
            .init(vec!["SET NAMES utf8mb4"]);

        let conn = Conn::new(opts).map_err(|e| {
            FacadeError::Connection(format!(
                "{}@{}/{}: {}",
                target.user, target.host, target.database, e
            ))
        })?;

        info!(host = %target.host, database = %target.database, "opened mysql session");
        Ok(Box::new(MysqlSession { conn }))
    }
}

/// A single blocking MySQL connection.
pub struct MysqlSession {
    conn: Conn,
}

fn bind(params: &[Value]) -> Params {
    if params.is_empty() {
        Params::Empty
    } else {
        Params::Positional(params.iter().map(to_mysql).collect())
    }
}

fn query_error(e: ::mysql::Error) -> FacadeError {
    FacadeError::Query(e.to_string())
}

impl Session for MysqlSession {
    fn execute(&mut self, sql: &str, params: &[Value]) -> Result<u64> {
        self.conn.exec_drop(sql, bind(params)).map_err(query_error)?;
        Ok(self.conn.last_insert_id())
    }

    fn fetch_one(&mut self, sql: &str, params: &[Value]) -> Result<Option<Row>> {
        let row: Option<::mysql::Row> = self.conn.exec_first(sql, bind(params)).map_err(query_error)?;
        Ok(row.map(convert_row))
    }

    fn fetch_all(&mut self, sql: &str, params: &[Value]) -> Result<Vec<Row>> {
        let rows: Vec<::mysql::Row> = self.conn.exec(sql, bind(params)).map_err(query_error)?;
        Ok(rows.into_iter().map(convert_row).collect())
    }

    fn fetch_scalar(&mut self, sql: &str, params: &[Value]) -> Result<Option<Value>> {
        let row: Option<::mysql::Row> = self.conn.exec_first(sql, bind(params)).map_err(query_error)?;
        Ok(row.and_then(|row| row.unwrap().into_iter().next().map(from_mysql)))
    }
}

fn convert_row(row: ::mysql::Row) -> Row {
    let names: Vec<String> = row
        .columns_ref()
        .iter()
        .map(|column| column.name_str().into_owned())
        .collect();
    names
        .into_iter()
        .zip(row.unwrap().into_iter().map(from_mysql))
        .collect()
}

fn to_mysql(value: &Value) -> ::mysql::Value {
    match value {
        Value::Null => ::mysql::Value::NULL,
        Value::Int(i) => ::mysql::Value::Int(*i),
        Value::UInt(u) => ::mysql::Value::UInt(*u),
        Value::Float(f) => ::mysql::Value::Double(*f),
        Value::Text(s) => ::mysql::Value::Bytes(s.clone().into_bytes()),
        Value::Bytes(b) => ::mysql::Value::Bytes(b.clone()),
    }
}

fn from_mysql(value: ::mysql::Value) -> Value {
    match value {
        ::mysql::Value::NULL => Value::Null,
        ::mysql::Value::Bytes(bytes) => match String::from_utf8(bytes) {
            Ok(text) => Value::Text(text),
            Err(e) => Value::Bytes(e.into_bytes()),
        },
        ::mysql::Value::Int(i) => Value::Int(i),
        ::mysql::Value::UInt(u) => Value::UInt(u),
        ::mysql::Value::Float(f) => Value::Float(f64::from(f)),
        ::mysql::Value::Double(f) => Value::Float(f),
        ::mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            );
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            Value::Text(text)
        }
        ::mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let hours = u64::from(days) * 24 + u64::from(hours);
            let mut text = format!(
                "{}{:02}:{:02}:{:02}",
                if negative { "-" } else { "" },
                hours,
                minutes,
                seconds
            );
            if micros > 0 {
                text.push_str(&format!(".{:06}", micros));
            }
            Value::Text(text)
        }
    }
}

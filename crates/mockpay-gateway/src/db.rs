use mockpay::{
    CartItem, Customer, FailureCode, PaymentSession, PaymentStatus, RequestData, Transaction,
};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::GatewayError;

/// SQLite store for checkout sessions and payment transactions.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, GatewayError> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Ephemeral store, used by tests and `MOCKPAY_DATABASE_URL=sqlite://:memory:`.
    pub fn in_memory() -> Result<Self, GatewayError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, GatewayError> {
        self.conn
            .lock()
            .map_err(|_| GatewayError::Internal("database lock poisoned".to_string()))
    }

    fn init_schema(&self) -> Result<(), GatewayError> {
        let conn = self.lock()?;

        // WAL is a no-op for in-memory databases.
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS payment_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT UNIQUE NOT NULL,
                cart_snapshot TEXT NOT NULL,
                customer TEXT,
                amount REAL NOT NULL,
                currency TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                cart_snapshot TEXT NOT NULL,
                request_data TEXT NOT NULL,
                amount REAL NOT NULL,
                currency TEXT NOT NULL,
                status TEXT NOT NULL,
                code TEXT,
                transaction_id TEXT,
                timestamp TEXT NOT NULL,
                client_ip TEXT,
                created_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS ix_transactions_session ON transactions(session_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS ix_transactions_status ON transactions(status)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS ix_transactions_txn_id ON transactions(transaction_id)",
            [],
        )?;

        Ok(())
    }

    /// Run `f` inside a SQL transaction.
    ///
    /// Commits when `f` returns `Ok`; an `Err` drops the transaction, which
    /// rolls it back. The connection lock is released on every exit path.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, GatewayError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> Result<T, GatewayError>,
    {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }

    pub fn create_session(&self, session: &PaymentSession) -> Result<(), GatewayError> {
        self.with_transaction(|conn| insert_session(conn, session))
    }

    pub fn get_session(&self, session_id: &str) -> Result<Option<PaymentSession>, GatewayError> {
        self.with_transaction(|conn| find_session(conn, session_id))
    }

    pub fn record_transaction(&self, txn: &Transaction) -> Result<i64, GatewayError> {
        self.with_transaction(|conn| insert_transaction(conn, txn))
    }

    pub fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, GatewayError> {
        self.with_transaction(|conn| find_transaction(conn, transaction_id))
    }

    /// Most recent transactions first. `limit` is clamped to 1..=500.
    pub fn list_recent_transactions(&self, limit: u32) -> Result<Vec<Transaction>, GatewayError> {
        self.with_transaction(|conn| recent_transactions(conn, limit))
    }
}

pub fn insert_session(conn: &Connection, session: &PaymentSession) -> Result<(), GatewayError> {
    let cart = serde_json::to_string(&session.cart_snapshot)?;
    let customer = session
        .customer
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    conn.execute(
        r#"
        INSERT INTO payment_sessions (session_id, cart_snapshot, customer, amount, currency, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
        params![
            session.session_id,
            cart,
            customer,
            session.amount,
            session.currency,
            session.created_at
        ],
    )?;
    Ok(())
}

pub fn find_session(
    conn: &Connection,
    session_id: &str,
) -> Result<Option<PaymentSession>, GatewayError> {
    let row = conn
        .query_row(
            r#"
            SELECT session_id, cart_snapshot, customer, amount, currency, created_at
            FROM payment_sessions
            WHERE session_id = ?1
            "#,
            params![session_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            },
        )
        .optional()?;

    let Some((session_id, cart, customer, amount, currency, created_at)) = row else {
        return Ok(None);
    };

    Ok(Some(PaymentSession {
        session_id,
        cart_snapshot: serde_json::from_str::<Vec<CartItem>>(&cart)?,
        customer: customer
            .as_deref()
            .map(serde_json::from_str::<Customer>)
            .transpose()?,
        amount,
        currency,
        created_at,
    }))
}

pub fn insert_transaction(conn: &Connection, txn: &Transaction) -> Result<i64, GatewayError> {
    let cart = serde_json::to_string(&txn.cart_snapshot)?;
    let request_data = serde_json::to_string(&txn.request_data)?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        r#"
        INSERT INTO transactions (session_id, cart_snapshot, request_data, amount, currency, status, code, transaction_id, timestamp, client_ip, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        "#,
        params![
            txn.session_id,
            cart,
            request_data,
            txn.amount,
            txn.currency,
            txn.status.as_str(),
            txn.code.map(|c| c.as_str()),
            txn.transaction_id,
            txn.timestamp,
            txn.client_ip,
            now
        ],
    )?;

    Ok(conn.last_insert_rowid())
}

pub fn find_transaction(
    conn: &Connection,
    transaction_id: &str,
) -> Result<Option<Transaction>, GatewayError> {
    let row = conn
        .query_row(
            &format!("{TRANSACTION_COLUMNS} WHERE transaction_id = ?1 ORDER BY id DESC LIMIT 1"),
            params![transaction_id],
            TransactionRow::from_row,
        )
        .optional()?;

    row.map(TransactionRow::into_transaction).transpose()
}

pub fn recent_transactions(conn: &Connection, limit: u32) -> Result<Vec<Transaction>, GatewayError> {
    let limit = limit.clamp(1, 500);
    let mut stmt = conn.prepare(&format!("{TRANSACTION_COLUMNS} ORDER BY id DESC LIMIT ?1"))?;

    let rows = stmt
        .query_map(params![limit], TransactionRow::from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(TransactionRow::into_transaction)
        .collect()
}

const TRANSACTION_COLUMNS: &str = r#"
    SELECT session_id, cart_snapshot, request_data, amount, currency, status, code, transaction_id, timestamp, client_ip
    FROM transactions
"#;

/// Raw column values; JSON and enum decoding happens outside the rusqlite callback.
struct TransactionRow {
    session_id: String,
    cart_snapshot: String,
    request_data: String,
    amount: f64,
    currency: String,
    status: String,
    code: Option<String>,
    transaction_id: Option<String>,
    timestamp: String,
    client_ip: Option<String>,
}

impl TransactionRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            session_id: row.get(0)?,
            cart_snapshot: row.get(1)?,
            request_data: row.get(2)?,
            amount: row.get(3)?,
            currency: row.get(4)?,
            status: row.get(5)?,
            code: row.get(6)?,
            transaction_id: row.get(7)?,
            timestamp: row.get(8)?,
            client_ip: row.get(9)?,
        })
    }

    fn into_transaction(self) -> Result<Transaction, GatewayError> {
        Ok(Transaction {
            session_id: self.session_id,
            cart_snapshot: serde_json::from_str(&self.cart_snapshot)?,
            request_data: serde_json::from_str::<RequestData>(&self.request_data)?,
            amount: self.amount,
            currency: self.currency,
            status: self.status.parse::<PaymentStatus>()?,
            code: self.code.as_deref().map(str::parse::<FailureCode>).transpose()?,
            transaction_id: self.transaction_id,
            timestamp: self.timestamp,
            client_ip: self.client_ip,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str) -> PaymentSession {
        PaymentSession {
            session_id: id.to_string(),
            cart_snapshot: vec![CartItem {
                id: "prod_001".to_string(),
                name: "Monthly Gym Membership".to_string(),
                qty: 1,
                price: 499.0,
            }],
            customer: Some(Customer {
                name: Some("Aditya Nair".to_string()),
                email: Some("aditya@example.com".to_string()),
            }),
            amount: 499.0,
            currency: "INR".to_string(),
            created_at: 1_700_000_000,
        }
    }

    fn request_data(last4: &str) -> RequestData {
        RequestData {
            card_last4: last4.to_string(),
            card_masked: format!("**** **** **** {last4}"),
            name: "Aditya Nair".to_string(),
            expiry: "12/27".to_string(),
            billing_email: Some("aditya@example.com".to_string()),
            luhn: true,
        }
    }

    #[test]
    fn test_create_and_get_session() {
        let db = Database::in_memory().unwrap();
        let s = session("MOCK_S_000000001");
        db.create_session(&s).unwrap();

        let fetched = db.get_session("MOCK_S_000000001").unwrap().unwrap();
        assert_eq!(fetched, s);
        assert!(db.get_session("MOCK_S_999999999").unwrap().is_none());
    }

    #[test]
    fn test_session_without_customer() {
        let db = Database::in_memory().unwrap();
        let s = PaymentSession {
            customer: None,
            ..session("MOCK_S_000000002")
        };
        db.create_session(&s).unwrap();
        assert!(db
            .get_session("MOCK_S_000000002")
            .unwrap()
            .unwrap()
            .customer
            .is_none());
    }

    #[test]
    fn test_duplicate_session_id_rejected() {
        let db = Database::in_memory().unwrap();
        db.create_session(&session("MOCK_S_000000003")).unwrap();
        assert!(matches!(
            db.create_session(&session("MOCK_S_000000003")),
            Err(GatewayError::Database(_))
        ));
    }

    #[test]
    fn test_record_and_get_transaction() {
        let db = Database::in_memory().unwrap();
        let s = session("MOCK_S_000000004");
        db.create_session(&s).unwrap();

        let txn = Transaction::approved(
            &s,
            request_data("4242"),
            "MOCK_TXN_0000000001".to_string(),
            "2024-05-01T10:00:00+00:00".to_string(),
            Some("127.0.0.1".to_string()),
        );
        db.record_transaction(&txn).unwrap();

        let fetched = db.get_transaction("MOCK_TXN_0000000001").unwrap().unwrap();
        assert_eq!(fetched, txn);
        assert_eq!(fetched.status, PaymentStatus::Success);
        assert!(db.get_transaction("MOCK_TXN_9999999999").unwrap().is_none());
    }

    #[test]
    fn test_list_recent_newest_first() {
        let db = Database::in_memory().unwrap();
        let s = session("MOCK_S_000000005");
        db.create_session(&s).unwrap();

        for i in 0..3 {
            let txn = Transaction::declined(
                &s,
                request_data("0001"),
                FailureCode::InsufficientFunds,
                format!("2024-05-01T10:00:0{i}+00:00"),
                None,
            );
            db.record_transaction(&txn).unwrap();
        }
        let ok = Transaction::approved(
            &s,
            request_data("4242"),
            "MOCK_TXN_0000000002".to_string(),
            "2024-05-01T10:00:09+00:00".to_string(),
            None,
        );
        db.record_transaction(&ok).unwrap();

        let txns = db.list_recent_transactions(50).unwrap();
        assert_eq!(txns.len(), 4);
        assert_eq!(txns[0].transaction_id.as_deref(), Some("MOCK_TXN_0000000002"));
        assert_eq!(txns[1].timestamp, "2024-05-01T10:00:02+00:00");
        assert_eq!(txns[3].timestamp, "2024-05-01T10:00:00+00:00");
        assert_eq!(txns[1].code, Some(FailureCode::InsufficientFunds));

        let limited = db.list_recent_transactions(2).unwrap();
        assert_eq!(limited.len(), 2);

        // Multiple transactions may reference one session.
        assert!(txns.iter().all(|t| t.session_id == s.session_id));
    }

    #[test]
    fn test_with_transaction_rolls_back_on_error() {
        let db = Database::in_memory().unwrap();
        let result: Result<(), GatewayError> = db.with_transaction(|conn| {
            insert_session(conn, &session("MOCK_S_000000006"))?;
            Err(GatewayError::Internal("abort".to_string()))
        });
        assert!(result.is_err());
        assert!(db.get_session("MOCK_S_000000006").unwrap().is_none());

        // The lock is released and the store is still usable.
        db.create_session(&session("MOCK_S_000000007")).unwrap();
    }
}

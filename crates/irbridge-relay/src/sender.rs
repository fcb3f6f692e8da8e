use std::io::Write;

use tracing::{debug, warn};

use crate::endpoint::Endpoint;

/// How hard [`ResilientSender::attempt_send`] tries before dropping a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Connect attempts made back-to-back after a failed write. Default: 1.
    pub reconnect_attempts: u32,
    /// Writes retried on a fresh connection after the first one fails. Default: 1.
    pub write_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            reconnect_attempts: 1,
            write_retries: 1,
        }
    }
}

/// Delivers payloads over a lazily opened connection, reconnecting when it drops.
///
/// Delivery is at-most-once and fire-and-forget. A payload that cannot be
/// written within the [`RetryPolicy`] is dropped; the caller only learns
/// whether it went out. Every failure leaves the sender disconnected, and
/// the next call starts with a fresh connect.
///
/// Sends take `&mut self`. Callers sharing a sender across threads must
/// serialize access (e.g. a `Mutex`) so the connect/write/close sequence of
/// one call is not interleaved with another's.
pub struct ResilientSender<E: Endpoint> {
    endpoint: E,
    conn: Option<E::Conn>,
    policy: RetryPolicy,
}

impl<E: Endpoint> ResilientSender<E> {
    pub fn new(endpoint: E) -> Self {
        Self::with_policy(endpoint, RetryPolicy::default())
    }

    pub fn with_policy(endpoint: E, policy: RetryPolicy) -> Self {
        Self {
            endpoint,
            conn: None,
            policy,
        }
    }

    /// Try to deliver `payload`. Returns `true` if it was written.
    pub fn attempt_send(&mut self, payload: &[u8]) -> bool {
        let mut conn = match self.conn.take() {
            Some(conn) => conn,
            None => match self.endpoint.connect() {
                Ok(conn) => conn,
                Err(err) => {
                    warn!(error = %err, "can't connect to control endpoint");
                    return false;
                }
            },
        };

        let mut retries_left = self.policy.write_retries;
        loop {
            let err = match write_payload(&mut conn, payload) {
                Ok(()) => {
                    self.conn = Some(conn);
                    return true;
                }
                Err(err) => err,
            };

            self.endpoint.close(conn);
            if retries_left == 0 {
                warn!(error = %err, "can't send to control endpoint; payload dropped");
                return false;
            }
            retries_left -= 1;
            debug!(error = %err, "control endpoint write failed; reconnecting");

            conn = match self.reconnect() {
                Some(conn) => conn,
                None => return false,
            };
        }
    }

    fn reconnect(&mut self) -> Option<E::Conn> {
        let mut last_err = None;
        for attempt in 1..=self.policy.reconnect_attempts {
            match self.endpoint.connect() {
                Ok(conn) => return Some(conn),
                Err(err) => {
                    debug!(attempt, error = %err, "reconnect failed");
                    last_err = Some(err);
                }
            }
        }
        match last_err {
            Some(err) => warn!(error = %err, "control endpoint connection dropped"),
            None => warn!("control endpoint connection dropped; reconnect disabled"),
        }
        None
    }

    /// Close the current connection, if any.
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            self.endpoint.close(conn);
        }
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }
}

fn write_payload<W: Write>(conn: &mut W, payload: &[u8]) -> std::io::Result<()> {
    conn.write_all(payload)?;
    conn.flush()
}

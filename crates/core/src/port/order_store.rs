// Order Store Port (Interface)

use crate::domain::{Order, OrderId, OrderStatus};
use crate::error::Result;
use async_trait::async_trait;

/// Filter for sweep candidate selection
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pub statuses: Vec<OrderStatus>,
    pub payment_method: String,
    /// Oldest creation timestamp (epoch ms) to include
    pub created_after: i64,
    pub limit: u32,
}

/// Store interface for order persistence, owned by the host application.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders matching the filter, in the store's natural ordering, capped
    /// at `filter.limit`. Callers must not assume any ordering beyond
    /// "a prefix of at most limit matching records".
    async fn find_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Order>>;

    /// Find order by ID
    async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>>;

    /// Mark the order's payment complete and record the provider transaction
    /// reference against it. Idempotent: completing an already-completed
    /// order is a no-op, detected here and not by the caller.
    async fn complete_payment(&self, id: &OrderId, reference: &str) -> Result<()>;

    /// Append an audit note to the order
    async fn add_note(&self, id: &OrderId, text: &str) -> Result<()>;
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::Mutex;

    /// In-memory order store for tests. Applies the same filter semantics as
    /// the SQLite adapter (most-recent-first, capped) and records completion
    /// and note calls for assertions.
    pub struct MemoryOrderStore {
        orders: Mutex<Vec<Order>>,
        notes: Mutex<Vec<(OrderId, String)>>,
        completions: Mutex<Vec<(OrderId, String)>>,
        fail_completions: Mutex<bool>,
    }

    impl MemoryOrderStore {
        pub fn new(orders: Vec<Order>) -> Self {
            Self {
                orders: Mutex::new(orders),
                notes: Mutex::new(Vec::new()),
                completions: Mutex::new(Vec::new()),
                fail_completions: Mutex::new(false),
            }
        }

        pub fn empty() -> Self {
            Self::new(Vec::new())
        }

        /// Make subsequent complete_payment calls fail with a store error
        pub fn fail_completions(&self) {
            *self.fail_completions.lock().unwrap() = true;
        }

        pub fn notes(&self) -> Vec<(OrderId, String)> {
            self.notes.lock().unwrap().clone()
        }

        /// (order_id, reference) pairs passed to complete_payment, including
        /// no-op calls against already-completed orders
        pub fn completion_calls(&self) -> Vec<(OrderId, String)> {
            self.completions.lock().unwrap().clone()
        }

        pub fn status_of(&self, id: &str) -> Option<OrderStatus> {
            self.orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.id == id)
                .map(|o| o.status.clone())
        }
    }

    #[async_trait]
    impl OrderStore for MemoryOrderStore {
        async fn find_candidates(&self, filter: &CandidateFilter) -> Result<Vec<Order>> {
            let orders = self.orders.lock().unwrap();
            let mut matches: Vec<Order> = orders
                .iter()
                .filter(|o| {
                    filter.statuses.contains(&o.status)
                        && o.payment_method == filter.payment_method
                        && o.created_at >= filter.created_after
                })
                .cloned()
                .collect();
            matches.sort_by_key(|o| std::cmp::Reverse(o.created_at));
            matches.truncate(filter.limit as usize);
            Ok(matches)
        }

        async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| &o.id == id)
                .cloned())
        }

        async fn complete_payment(&self, id: &OrderId, reference: &str) -> Result<()> {
            if *self.fail_completions.lock().unwrap() {
                return Err(AppError::Database("order store write failed".to_string()));
            }
            self.completions
                .lock()
                .unwrap()
                .push((id.clone(), reference.to_string()));

            let mut orders = self.orders.lock().unwrap();
            let order = orders
                .iter_mut()
                .find(|o| &o.id == id)
                .ok_or_else(|| AppError::NotFound(format!("Order {id} not found")))?;
            // Idempotence lives here: already-completed orders are untouched
            if order.status != OrderStatus::Completed {
                order.status = OrderStatus::Completed;
                order.provider_reference = Some(reference.to_string());
            }
            Ok(())
        }

        async fn add_note(&self, id: &OrderId, text: &str) -> Result<()> {
            self.notes
                .lock()
                .unwrap()
                .push((id.clone(), text.to_string()));
            Ok(())
        }
    }
}

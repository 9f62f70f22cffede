//! Cart store: in-memory cart state plus persistence orchestration.
//!
//! # Responsibility
//! - Own the ordered in-memory cart for the process lifetime.
//! - Apply add/increment/decrement mutations and persist the result.
//!
//! # Invariants
//! - No two lines in the cart share a product id.
//! - Every line has quantity >= 1; a line whose quantity would reach 0 is
//!   removed instead.
//! - Persistence is a synchronous tail step of every mutation: the state
//!   written to storage is always the freshly mutated state, never a stale
//!   pre-mutation snapshot.

use crate::model::product::{NewProduct, Product};
use crate::repo::cart_repo::{CartRepository, RepoError, RepoResult};
use log::{debug, warn};

/// Cart state container.
///
/// Created empty at app start, filled once by [`load`](Self::load), then
/// mutated by UI-driven operations. The repository is injected so tests
/// and previews can swap storage without touching cart logic.
pub struct CartService<R: CartRepository> {
    repo: R,
    products: Vec<Product>,
}

impl<R: CartRepository> CartService<R> {
    /// Creates an empty cart over the provided repository.
    ///
    /// Call [`load`](Self::load) before serving reads so a persisted cart
    /// from a previous app run becomes visible.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            products: Vec::new(),
        }
    }

    /// Replaces in-memory state with the persisted snapshot.
    ///
    /// # Contract
    /// - No stored snapshot leaves the cart empty.
    /// - A corrupt or invalid snapshot is discarded: the cart starts empty
    ///   and the bad bytes stay on disk until the next successful persist
    ///   overwrites them. A warning is logged.
    /// - Storage transport errors still propagate.
    pub fn load(&mut self) -> RepoResult<()> {
        match self.repo.load_snapshot() {
            Ok(Some(products)) => {
                debug!(
                    "event=cart_load module=cart status=ok items={}",
                    products.len()
                );
                self.products = products;
                Ok(())
            }
            Ok(None) => {
                debug!("event=cart_load module=cart status=ok items=0 snapshot=absent");
                self.products = Vec::new();
                Ok(())
            }
            Err(RepoError::Validation(err)) => {
                warn!("event=snapshot_discarded module=cart status=ok reason={err}");
                self.products = Vec::new();
                Ok(())
            }
            Err(RepoError::InvalidData(message)) => {
                warn!("event=snapshot_discarded module=cart status=ok reason={message}");
                self.products = Vec::new();
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    /// Adds a catalog product to the cart.
    ///
    /// # Contract
    /// - Invalid input is rejected before any state change.
    /// - Known id: that line's quantity grows by 1; order is untouched.
    /// - Unknown id: a new line with quantity 1 is appended.
    pub fn add_to_cart(&mut self, item: NewProduct) -> RepoResult<()> {
        let item = Product::from(item);
        item.validate()?;

        match self.find_mut(&item.id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(1),
            None => self.products.push(item),
        }
        self.persist()
    }

    /// Increments the quantity of the line with the given id.
    ///
    /// An unknown id leaves the cart unchanged; the snapshot is still
    /// written so storage converges with memory.
    pub fn increment(&mut self, id: &str) -> RepoResult<()> {
        if let Some(product) = self.find_mut(id) {
            product.quantity = product.quantity.saturating_add(1);
        }
        self.persist()
    }

    /// Decrements the quantity of the line with the given id.
    ///
    /// # Contract
    /// - Quantity > 1: decremented by 1.
    /// - Quantity == 1: the line is removed from the cart.
    /// - Unknown id: no-op.
    pub fn decrement(&mut self, id: &str) -> RepoResult<()> {
        if let Some(index) = self.products.iter().position(|p| p.id == id) {
            if self.products[index].quantity > 1 {
                self.products[index].quantity -= 1;
            } else {
                self.products.remove(index);
            }
        }
        self.persist()
    }

    /// Current cart contents in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Total units across all lines.
    pub fn total_quantity(&self) -> u32 {
        self.products.iter().map(|p| p.quantity).sum()
    }

    /// Cart subtotal across all lines.
    pub fn subtotal(&self) -> f64 {
        self.products.iter().map(Product::line_total).sum()
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Product> {
        self.products.iter_mut().find(|p| p.id == id)
    }

    // The in-memory mutation stays applied even when the write fails; the
    // next successful mutation persists the full current state anyway.
    fn persist(&self) -> RepoResult<()> {
        let result = self.repo.save_snapshot(&self.products);
        match &result {
            Ok(()) => debug!(
                "event=cart_persist module=cart status=ok items={}",
                self.products.len()
            ),
            Err(err) => warn!("event=cart_persist module=cart status=error error={err}"),
        }
        result
    }
}

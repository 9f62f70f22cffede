//! FFI use-case API for Flutter-facing cart calls.
//!
//! # Responsibility
//! - Expose the cart store to Dart as stable, use-case-level functions.
//! - Own the process-wide cart store handle ("provider" scope).
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Cart accessors called before `cart_open` fail with a provider-scope
//!   error instead of touching storage.
//! - Every mutation response reflects the post-mutation in-memory state.

use gomarket_core::db::open_db;
use gomarket_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CartService, NewProduct, Product, SqliteCartRepository,
};
use std::path::PathBuf;
use std::sync::Mutex;

type Store = CartService<SqliteCartRepository>;

/// Process-wide cart handle. Path and store live behind one lock so an
/// open-in-progress can never be observed half-registered.
struct CartHandle {
    db_path: PathBuf,
    store: Store,
}

static CART: Mutex<Option<CartHandle>> = Mutex::new(None);

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Sync call; may perform small file-system setup work.
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on
///   failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Cart line as shown to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub price: f64,
    pub quantity: u32,
}

/// Response envelope for cart reads.
#[derive(Debug, Clone, PartialEq)]
pub struct CartListResponse {
    /// Whether the read succeeded.
    pub ok: bool,
    /// Cart lines in insertion order (empty on failure).
    pub items: Vec<CartItemView>,
    /// Total units across all lines.
    pub total_quantity: u32,
    /// Cart subtotal across all lines.
    pub subtotal: f64,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

/// Response envelope for cart mutations and store bootstrap.
#[derive(Debug, Clone, PartialEq)]
pub struct CartActionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Number of cart lines after the operation.
    pub item_count: u32,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl CartActionResponse {
    fn success(message: impl Into<String>, item_count: usize) -> Self {
        Self {
            ok: true,
            item_count: item_count as u32,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            item_count: 0,
            message: message.into(),
        }
    }
}

/// Opens the process-wide cart store and loads the persisted cart.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Idempotent for the same `db_path`; a different path is rejected.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_open(db_path: String) -> CartActionResponse {
    let requested = PathBuf::from(db_path.trim());
    if requested.as_os_str().is_empty() {
        return CartActionResponse::failure("cart_open failed: db_path cannot be empty");
    }

    let Ok(mut slot) = CART.lock() else {
        return CartActionResponse::failure("cart_open failed: cart store lock is poisoned");
    };

    if let Some(handle) = slot.as_ref() {
        if handle.db_path == requested {
            return CartActionResponse::success(
                "Cart already open.",
                handle.store.products().len(),
            );
        }
        return CartActionResponse::failure(format!(
            "cart_open failed: cart already open at `{}`; refusing to switch to `{}`",
            handle.db_path.display(),
            requested.display()
        ));
    }

    // The lock is held across the open, so a concurrent caller waits and
    // then takes the already-open or refusal path above. A failed open
    // leaves the slot empty and `cart_open` can be retried.
    match open_store(&requested) {
        Ok(store) => {
            let item_count = store.products().len();
            *slot = Some(CartHandle {
                db_path: requested,
                store,
            });
            CartActionResponse::success("Cart opened.", item_count)
        }
        Err(message) => CartActionResponse::failure(message),
    }
}

/// Returns the current cart contents.
///
/// # FFI contract
/// - Sync call, served from in-memory state.
/// - Requires a prior successful `cart_open`.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_products() -> CartListResponse {
    let Ok(slot) = CART.lock() else {
        return list_failure("cart_products failed: cart store lock is poisoned".to_string());
    };
    let Some(handle) = slot.as_ref() else {
        return list_failure(provider_error("cart_products"));
    };

    let store = &handle.store;
    let items: Vec<CartItemView> = store.products().iter().map(to_item_view).collect();
    let message = if items.is_empty() {
        "Cart is empty.".to_string()
    } else {
        format!("{} item(s) in cart.", items.len())
    };
    CartListResponse {
        ok: true,
        total_quantity: store.total_quantity(),
        subtotal: store.subtotal(),
        items,
        message,
    }
}

/// Adds a catalog product to the cart (new line or +1 on an existing one).
///
/// # FFI contract
/// - Sync call; persistence is a tail step of the mutation.
/// - A persist failure is reported in the envelope but the in-memory
///   mutation stays applied.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_add(id: String, title: String, image_url: String, price: f64) -> CartActionResponse {
    let item = NewProduct {
        id,
        title,
        image_url,
        price,
    };
    with_store("cart_add", move |store| {
        store.add_to_cart(item)?;
        Ok(CartActionResponse::success(
            "Added to cart.",
            store.products().len(),
        ))
    })
}

/// Increments the quantity of the cart line with the given id.
///
/// # FFI contract
/// - Sync call; unknown ids are a no-op reported as success.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_increment(id: String) -> CartActionResponse {
    with_store("cart_increment", move |store| {
        store.increment(&id)?;
        Ok(CartActionResponse::success(
            "Quantity updated.",
            store.products().len(),
        ))
    })
}

/// Decrements the quantity of the cart line with the given id; the line
/// is removed when its quantity reaches zero.
///
/// # FFI contract
/// - Sync call; unknown ids are a no-op reported as success.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn cart_decrement(id: String) -> CartActionResponse {
    with_store("cart_decrement", move |store| {
        store.decrement(&id)?;
        Ok(CartActionResponse::success(
            "Quantity updated.",
            store.products().len(),
        ))
    })
}

fn open_store(path: &std::path::Path) -> Result<Store, String> {
    let conn = open_db(path).map_err(|err| format!("cart_open failed: {err}"))?;
    let repo = SqliteCartRepository::try_new(conn)
        .map_err(|err| format!("cart_open failed: {err}"))?;
    let mut store = CartService::new(repo);
    store
        .load()
        .map_err(|err| format!("cart_open failed: {err}"))?;
    Ok(store)
}

fn with_store(
    op: &str,
    f: impl FnOnce(&mut Store) -> gomarket_core::RepoResult<CartActionResponse>,
) -> CartActionResponse {
    let Ok(mut slot) = CART.lock() else {
        return CartActionResponse::failure(format!(
            "{op} failed: cart store lock is poisoned"
        ));
    };
    let Some(handle) = slot.as_mut() else {
        return CartActionResponse::failure(provider_error(op));
    };

    match f(&mut handle.store) {
        Ok(response) => response,
        Err(err) => CartActionResponse::failure(format!("{op} failed: {err}")),
    }
}

fn provider_error(op: &str) -> String {
    format!("{op} failed: cart store is not open; call cart_open first")
}

fn list_failure(message: String) -> CartListResponse {
    CartListResponse {
        ok: false,
        items: Vec::new(),
        total_quantity: 0,
        subtotal: 0.0,
        message,
    }
}

fn to_item_view(product: &Product) -> CartItemView {
    CartItemView {
        id: product.id.clone(),
        title: product.title.clone(),
        image_url: product.image_url.clone(),
        price: product.price,
        quantity: product.quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        cart_add, cart_decrement, cart_increment, cart_open, cart_products, core_version,
        init_logging, ping,
    };

    fn open_test_cart() {
        let path = std::env::temp_dir().join(format!("gomarket-ffi-{}.db", std::process::id()));
        let response = cart_open(path.to_str().expect("temp path should be UTF-8").to_string());
        assert!(response.ok, "{}", response.message);
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn cart_open_rejects_empty_path() {
        let response = cart_open("   ".to_string());
        assert!(!response.ok);
        assert!(response.message.contains("db_path"));
    }

    #[test]
    fn cart_flow_add_increment_decrement() {
        open_test_cart();

        let token = format!("ffi-{}", std::process::id());
        let added = cart_add(
            token.clone(),
            "Shirt".to_string(),
            "https://cdn.example/shirt.png".to_string(),
            10.0,
        );
        assert!(added.ok, "{}", added.message);

        let bumped = cart_increment(token.clone());
        assert!(bumped.ok, "{}", bumped.message);

        let listed = cart_products();
        assert!(listed.ok, "{}", listed.message);
        let line = listed
            .items
            .iter()
            .find(|item| item.id == token)
            .expect("added line should be listed");
        assert_eq!(line.quantity, 2);

        // Drain the line so repeated runs against the same temp DB start
        // from a known state for this id.
        let first = cart_decrement(token.clone());
        assert!(first.ok, "{}", first.message);
        let second = cart_decrement(token.clone());
        assert!(second.ok, "{}", second.message);
        assert!(cart_products().items.iter().all(|item| item.id != token));
    }

    #[test]
    fn cart_open_is_idempotent_for_same_path_and_rejects_other_paths() {
        open_test_cart();
        open_test_cart();

        let other = std::env::temp_dir().join("gomarket-ffi-other.db");
        let response = cart_open(other.to_str().expect("temp path is UTF-8").to_string());
        assert!(!response.ok);
        assert!(response.message.contains("refusing to switch"));
    }
}

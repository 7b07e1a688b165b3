//! Shared helpers for store tests: an in-memory database, a temp
//! directory for the queue snapshot, and seed shortcuts.

use tempfile::TempDir;

use procura_core::{Actor, Product, PurchaseOrder, Vendor};
use procura_db::{Database, DbConfig};

use crate::config::StoreConfig;
use crate::store::ProcuraStore;
use crate::views::{NewProduct, NewVendor};

/// Opens a store over a fresh in-memory database. The returned TempDir
/// must stay alive as long as the store (it owns the snapshot path).
pub(crate) async fn open_test_store() -> (ProcuraStore, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    let store = ProcuraStore::open(db, StoreConfig::in_dir(dir.path()))
        .await
        .unwrap();
    (store, dir)
}

/// Simulates a restart: a new session over the same database and
/// snapshot directory.
pub(crate) async fn reopen_store(store: &ProcuraStore, dir: &TempDir) -> ProcuraStore {
    ProcuraStore::open(store.db.clone(), StoreConfig::in_dir(dir.path()))
        .await
        .unwrap()
}

pub(crate) fn sign_in(store: &ProcuraStore) {
    store.sign_in(Actor::new("user-1", "Pat"));
}

pub(crate) async fn seed_vendor(store: &ProcuraStore, name: &str) -> Vendor {
    store.add_vendor(NewVendor::named(name)).await.unwrap()
}

pub(crate) async fn seed_product(
    store: &ProcuraStore,
    name: &str,
    vendor_ref: Option<&str>,
) -> Product {
    let mut input = NewProduct::named(name);
    if let Some(vendor_ref) = vendor_ref {
        input = input.vendor(vendor_ref);
    }
    store.add_product(input).await.unwrap()
}

/// Seeds one vendor + product, queues it, generates, and returns the
/// resulting PO header. Requires a signed-in actor.
pub(crate) async fn queue_and_generate_one(store: &ProcuraStore) -> PurchaseOrder {
    let vendor = seed_vendor(store, "Generated Vendor").await;
    let product = seed_product(store, "Generated Product", Some(&vendor.id)).await;
    store.add_to_queue(&product.id, 2).await.unwrap();
    store
        .generate(None)
        .await
        .unwrap()
        .remove(0)
        .purchase_order
}

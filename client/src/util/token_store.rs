//! Persisted refresh-token storage with inline obfuscation.
//!
//! DESIGN
//! ======
//! The refresh token survives page reloads in `sessionStorage`, XOR-mixed
//! with a bundled key and base64-encoded. The key ships to the browser, so
//! this only obscures casual inspection of devtools; server-side revocation
//! is the actual security boundary.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

#[cfg(any(test, feature = "hydrate"))]
const STORAGE_KEY: &str = "inkwell.refresh_token";
const OBFUSCATION_KEY: &[u8] = b"inkwell-session-v1";

/// Reads and writes the single persisted refresh-token slot.
pub trait TokenStore {
    /// Load the persisted refresh token; `None` when absent or unreadable.
    fn load(&self) -> Option<String>;
    /// Persist `token`, replacing any previous value.
    fn save(&self, token: &str);
    /// Remove the persisted token.
    fn clear(&self);
}

fn xor_with_key(bytes: &mut [u8]) {
    for (i, b) in bytes.iter_mut().enumerate() {
        *b ^= OBFUSCATION_KEY[i % OBFUSCATION_KEY.len()];
    }
}

/// Obfuscate a token for storage: XOR with the bundled key, then base64.
#[must_use]
pub fn obfuscate(token: &str) -> String {
    let mut bytes = token.as_bytes().to_vec();
    xor_with_key(&mut bytes);
    BASE64.encode(bytes)
}

/// Reverse [`obfuscate`]. Returns `None` for values that do not decode
/// cleanly (corrupt or foreign storage entries).
#[must_use]
pub fn deobfuscate(stored: &str) -> Option<String> {
    let mut bytes = BASE64.decode(stored).ok()?;
    xor_with_key(&mut bytes);
    String::from_utf8(bytes).ok()
}

/// Browser store over `sessionStorage`. Session-scoped on purpose: closing
/// the tab drops the token and the next visit starts signed out.
#[derive(Clone, Copy, Debug, Default)]
pub struct SessionStorageStore;

#[cfg(feature = "hydrate")]
fn session_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.session_storage().ok().flatten())
}

impl TokenStore for SessionStorageStore {
    fn load(&self) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let raw = session_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
            deobfuscate(&raw)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    fn save(&self, token: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = session_storage() {
                let _ = storage.set_item(STORAGE_KEY, &obfuscate(token));
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = token;
        }
    }

    fn clear(&self) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = session_storage() {
                let _ = storage.remove_item(STORAGE_KEY);
            }
        }
    }
}

/// In-memory store for native tests and headless contexts. Clones share the
/// same slot so a test can inspect what the session persisted.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: std::rc::Rc<std::cell::RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    /// A store pre-seeded with a persisted token.
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_owned());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

//! The decoder contract: per-type decode functions and a name-keyed registry.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DecodeError;
use crate::reader::ObjectReader;

/// Implemented by types that decode themselves from a JSON object.
///
/// Implementations read field by field through the [`ObjectReader`]
/// operation matching each field's nullability and kind; their failures are
/// indistinguishable from any other read. Generated decoders follow the same
/// contract.
pub trait DecodeObject: Sized {
    fn decode_object(reader: &ObjectReader) -> Result<Self, DecodeError>;
}

/// A stored decode function producing a type-erased value.
pub type DecodeFn = Arc<dyn Fn(&ObjectReader) -> Result<Box<dyn Any>, DecodeError> + Send + Sync>;

/// Name-keyed registry of decode functions, for call sites that pick the
/// concrete type at runtime (e.g. from a discriminator field).
#[derive(Default, Clone)]
pub struct DecoderRegistry {
    decoders: HashMap<String, DecodeFn>,
}

impl DecoderRegistry {
    pub fn new() -> Self {
        DecoderRegistry {
            decoders: HashMap::new(),
        }
    }

    /// Registers `T`'s decoder under `name`.
    pub fn register<T: DecodeObject + Any>(&mut self, name: &str) {
        self.register_fn(
            name,
            Arc::new(|reader: &ObjectReader| {
                T::decode_object(reader).map(|value| Box::new(value) as Box<dyn Any>)
            }),
        );
    }

    /// Registers a hand-written decode function under `name`.
    pub fn register_fn(&mut self, name: &str, decode_fn: DecodeFn) {
        self.decoders.insert(name.to_string(), decode_fn);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decoders.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.decoders.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn get(&self, name: &str) -> Option<&DecodeFn> {
        self.decoders.get(name)
    }

    /// Runs the decoder registered under `name` and downcasts its result.
    ///
    /// `None` when nothing is registered under `name`, or when the decoder
    /// was registered for a type other than `T`.
    pub fn decode<T: Any>(
        &self,
        name: &str,
        reader: &ObjectReader,
    ) -> Option<Result<T, DecodeError>> {
        let decode_fn = self.get(name)?;
        match decode_fn(reader) {
            Ok(boxed) => boxed.downcast::<T>().ok().map(|value| Ok(*value)),
            Err(err) => Some(Err(err)),
        }
    }
}

impl std::fmt::Debug for DecoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecoderRegistry")
            .field("decoders", &self.names())
            .finish()
    }
}

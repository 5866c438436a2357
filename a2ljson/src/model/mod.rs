//! The typed a2l model
//!
//! Every struct corresponds to one keyword of the a2l format. Positional parameters
//! of a keyword become plain fields, optional child keywords become `Option` fields
//! or sequences. Keywords that are not known at their position are kept in the
//! `unknown` field of the entity that contains them.

mod characteristic;
mod conversion;
mod enums;
mod file;
mod function;
mod measurement;
mod module;
mod raw;
mod record_layout;

pub use characteristic::*;
pub use conversion::*;
pub use enums::*;
pub use file::*;
pub use function::*;
pub use measurement::*;
pub use module::*;
pub use raw::*;
pub use record_layout::*;

/// Access to the name of an item, used by [`ItemList`](crate::ItemList) for name lookups
pub trait A2lObjectName {
    fn get_name(&self) -> &str;
}

// implement A2lObjectName for entities that store their name in the field `name`
macro_rules! impl_object_name {
    ($($entity:ty),+ $(,)?) => {
        $(
            impl $crate::model::A2lObjectName for $entity {
                fn get_name(&self) -> &str {
                    &self.name
                }
            }
        )+
    };
}
pub(crate) use impl_object_name;

// serde helper: boolean flags are only written if they are set
#[allow(clippy::trivially_copy_pass_by_ref)]
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

//! Hand-authored protocol types for the CDP domains the Executor and
//! Action Engine actually exercise. This stands in for the "protocol
//! types collaborator" named in §6 of the spec — the code generator that
//! would normally produce these from the full CDP JSON schema is out of
//! scope (§1 Non-scope); only the subset of Page/DOM/Runtime/Input/
//! Network/Target/Log/Inspector used below is maintained by hand.

macro_rules! impl_method {
    ($ty:ty, $id:expr) => {
        impl crate::codec::Method for $ty {
            fn identifier(&self) -> std::borrow::Cow<'static, str> {
                std::borrow::Cow::Borrowed($id)
            }
        }
    };
}

macro_rules! impl_command {
    ($ty:ty, $id:expr, $resp:ty) => {
        impl_method!($ty, $id);
        impl crate::codec::Command for $ty {
            type Response = $resp;
        }
    };
}

pub(crate) use impl_command;
pub(crate) use impl_method;

pub mod css;
pub mod dom;
pub mod input;
pub mod inspector;
pub mod log;
pub mod network;
pub mod page;
pub mod runtime;
pub mod target;

/// Empty result type for commands whose CDP result object has no
/// fields, so `Execute` round-trips with a nil `outResult` the way the
/// spec's round-trip law (§8) expects.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct NoResult {}

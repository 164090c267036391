//! Macro for declaring driven-port error enums.
//!
//! Each variant carries named fields and a display template. The macro
//! derives `thiserror::Error` and emits a snake_case constructor per variant
//! whose parameters accept anything convertible into the field type, so
//! adapters can write `UserRepositoryError::query("timeout")`.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),* },
            )*
        }

        impl $name {
            $(
                ::paste::paste! {
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                }
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum ProbeStoreError {
            Offline { message: String } => "store offline: {message}",
            Clash { key: String, attempts: u32 } => "clash on {key} after {attempts} attempts",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = ProbeStoreError::offline("socket closed");
        assert_eq!(err.to_string(), "store offline: socket closed");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = ProbeStoreError::clash("pr-1", 3_u32);
        assert_eq!(
            err,
            ProbeStoreError::Clash {
                key: "pr-1".to_owned(),
                attempts: 3
            }
        );
        assert_eq!(err.to_string(), "clash on pr-1 after 3 attempts");
    }
}

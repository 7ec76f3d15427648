//! Defines helper macros for generating domain port error enums.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    define_port_error! {
        pub enum SampleStoreError {
            Offline { message: String } => "store offline: {message}",
            Missing { key: i32 } => "no row {key}",
            Stale { table: String, key: i32 } => "stale {table} row {key}",
        }
    }

    #[rstest]
    fn string_fields_accept_borrowed_text() {
        let err = SampleStoreError::offline("pool closed");
        assert_eq!(err.to_string(), "store offline: pool closed");
        assert_eq!(
            err,
            SampleStoreError::Offline {
                message: "pool closed".to_owned()
            }
        );
    }

    #[rstest]
    fn integer_fields_keep_their_type() {
        assert_eq!(SampleStoreError::missing(7).to_string(), "no row 7");
    }

    #[rstest]
    fn constructors_take_fields_in_declaration_order() {
        let err = SampleStoreError::stale("accounts", 3);
        assert_eq!(err.to_string(), "stale accounts row 3");
    }
}

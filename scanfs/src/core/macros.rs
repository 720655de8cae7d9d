// SPDX-License-Identifier: MIT

/// Generates the `From` conversions between error layers.
///
/// - `top`: each listed error wraps into the top-level variant
/// - `str_into`: `&'static str` becomes `Other` on every listed type and on the top type
/// - `sub`: a lower layer wraps into the named variant of each higher layer
#[macro_export]
macro_rules! fs_error_wiring {
    (
        top => $top:ty {
            $($top_src:ty : $top_variant:ident),+ $(,)?
        },
        str_into => [ $($str_tgt:ty),* $(,)? ],
        sub => {
            $($src_sub:ty => [ $($dst_sub:ident::$dst_variant:ident),+ ] ),* $(,)?
        } $(,)?
    ) => {
        $crate::__impl_into_fserror!{ $top; $( $top_src => $top_variant ),+ }

        $crate::__impl_str_into_errors!{ $top; $( $str_tgt ),* }

        $crate::__impl_sub_into_error!{ $( $src_sub => [ $( $dst_sub :: $dst_variant ),+ ] ),* }
    };
}

#[macro_export]
macro_rules! __impl_into_fserror {
    ($top:ty; $($t:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$t> for $top {
                #[inline]
                fn from(e: $t) -> Self { <$top>::$variant(e) }
            }
        )+
    }
}

#[macro_export]
macro_rules! __impl_str_into_errors {
    ($top:ty; $($t:ty),* $(,)?) => {
        $(
            impl From<&'static str> for $t {
                #[inline]
                fn from(msg: &'static str) -> Self { <$t>::Other(msg) }
            }
        )*
        impl From<&'static str> for $top {
            #[inline]
            fn from(msg: &'static str) -> Self { <$top>::Other(msg) }
        }
    }
}

#[macro_export]
macro_rules! __impl_sub_into_error {
    ($($src:ty => [ $( $dst:ident::$variant:ident ),+ ] ),* $(,)?) => {
        $(
            $(
                impl From<$src> for $dst {
                    #[inline]
                    fn from(e: $src) -> Self { <$dst>::$variant(e) }
                }
            )+
        )*
    }
}

/// Display an error followed by its `caused by` chain, and mark it as a
/// `core::error::Error` so it can cross into `anyhow` at the binary edge.
#[macro_export]
macro_rules! __impl_chain_display {
    ($($t:ty),+ $(,)?) => {
        $(
            impl core::fmt::Display for $t {
                fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                    write!(f, "{}", self.msg())?;
                    let mut current = self.source();
                    while let Some(src) = current {
                        write!(f, "\n  caused by: {}", src.msg())?;
                        current = src.source();
                    }
                    Ok(())
                }
            }

            impl core::error::Error for $t {}
        )+
    }
}

/// Returns `Err($err.into())` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return Err($err.into());
        }
    };
}

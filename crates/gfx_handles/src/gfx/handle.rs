//! Raw resource handles
//!
//! A handle is a plain `u64` id wrapped in a per-kind newtype. Id `0` is the
//! sentinel for "no resource". Handles are `Copy` and carry no ownership; see
//! [`Owned`](crate::Owned) for that.

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident, $key:ident) => {
        slotmap::new_key_type! {
            #[doc(hidden)]
            pub struct $key;
        }

        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name {
            id: u64,
        }

        impl $name {
            /// Sentinel handle that refers to no resource
            pub const INVALID: Self = Self { id: 0 };

            /// Wrap a raw id
            #[must_use]
            pub const fn from_id(id: u64) -> Self {
                Self { id }
            }

            /// Raw id, `0` for the sentinel
            #[must_use]
            pub const fn id(self) -> u64 {
                self.id
            }

            /// Whether this is the sentinel handle
            #[must_use]
            pub const fn is_invalid(self) -> bool {
                self.id == 0
            }
        }
    };
}

define_handle!(
    /// Handle to a buffer resource
    Buffer,
    BufferKey
);
define_handle!(
    /// Handle to an image resource
    Image,
    ImageKey
);
define_handle!(
    /// Handle to a sampler resource
    Sampler,
    SamplerKey
);
define_handle!(
    /// Handle to a shader resource
    Shader,
    ShaderKey
);
define_handle!(
    /// Handle to a pipeline resource
    Pipeline,
    PipelineKey
);
define_handle!(
    /// Handle to a view resource
    View,
    ViewKey
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sentinel() {
        assert_eq!(Buffer::default(), Buffer::INVALID);
        assert!(Image::default().is_invalid());
        assert_eq!(View::INVALID.id(), 0);
    }

    #[test]
    fn test_id_round_trip() {
        let shader = Shader::from_id(0x0001_0000_0002);
        assert_eq!(shader.id(), 0x0001_0000_0002);
        assert!(!shader.is_invalid());
        assert_eq!(shader, Shader::from_id(shader.id()));
    }
}

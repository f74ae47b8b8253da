// Byte arrays longer than 32 bytes do not implement `Default` and have no SSZ or tree hash impls
// in the SSZ crates, so signatures, public keys and KZG values get their own newtypes.
// The wrapped bytes are never interpreted. Signatures and keys are not decompressed.

macro_rules! fixed_bytes {
    ($(#[$attribute: meta])* $name: ident, $size: literal) => {
        $(#[$attribute])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, ::serde::Deserialize, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(
            #[serde(with = "serde_utils::prefixed_hex_or_bytes_array")] pub [u8; $size],
        );

        impl $name {
            pub const SIZE: usize = $size;

            #[must_use]
            pub const fn as_bytes(&self) -> &[u8; $size] {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self([0; $size])
            }
        }

        impl ::core::fmt::Debug for $name {
            fn fmt(&self, formatter: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
                formatter.write_str(&::const_hex::encode_prefixed(self.0))
            }
        }

        impl From<[u8; $size]> for $name {
            fn from(bytes: [u8; $size]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl ::ssz::Encode for $name {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $size
            }

            fn ssz_bytes_len(&self) -> usize {
                $size
            }

            fn ssz_append(&self, buffer: &mut Vec<u8>) {
                buffer.extend_from_slice(&self.0);
            }
        }

        impl ::ssz::Decode for $name {
            fn is_ssz_fixed_len() -> bool {
                true
            }

            fn ssz_fixed_len() -> usize {
                $size
            }

            fn from_ssz_bytes(bytes: &[u8]) -> Result<Self, ::ssz::DecodeError> {
                bytes
                    .try_into()
                    .map(Self)
                    .map_err(|_| ::ssz::DecodeError::InvalidByteLength {
                        len: bytes.len(),
                        expected: $size,
                    })
            }
        }

        impl ::tree_hash::TreeHash for $name {
            fn tree_hash_type() -> ::tree_hash::TreeHashType {
                ::tree_hash::TreeHashType::Vector
            }

            fn tree_hash_packed_encoding(&self) -> ::tree_hash::PackedEncoding {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_packing_factor() -> usize {
                unreachable!("Vector should never be packed.")
            }

            fn tree_hash_root(&self) -> ::tree_hash::Hash256 {
                ::tree_hash::merkle_root(&self.0, 0)
            }
        }
    };
}

pub(crate) use fixed_bytes;

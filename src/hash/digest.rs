//! Digest computation for the SHA-3 family
//!
//! Fixed-output SHA3-224/256/384/512 and extendable-output SHAKE128/256.
//! Every call builds a fresh [`Hasher`]; nothing is shared between files.

use crate::config::{HashAlgorithm, HashConfig, DEFAULT_BUFFER_SIZE};
use crate::error::{Result, Sha3SumError};
use crate::fs::open_input;
use sha3::digest::{ExtendableOutput, FixedOutput, Update, XofReader};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512, Shake128, Shake256};
use std::io::{BufReader, Read};
use std::path::Path;

/// An immutable digest value.
///
/// Equality is byte-wise and therefore length-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Decode a digest from hex (upper, lower or mixed case)
    pub fn from_hex(hex_str: impl AsRef<[u8]>) -> std::result::Result<Self, hex::FromHexError> {
        hex::decode(hex_str).map(Self)
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the digest has no bytes
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::LowerHex for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:x}", self)
    }
}

/// Unified hasher over the supported algorithms
pub enum Hasher {
    /// SHA3-224
    Sum224(Sha3_224),
    /// SHA3-256
    Sum256(Sha3_256),
    /// SHA3-384
    Sum384(Sha3_384),
    /// SHA3-512
    Sum512(Sha3_512),
    /// SHAKE128
    Shake128(Shake128),
    /// SHAKE256
    Shake256(Shake256),
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Sum224 => Self::Sum224(Sha3_224::default()),
            HashAlgorithm::Sum256 => Self::Sum256(Sha3_256::default()),
            HashAlgorithm::Sum384 => Self::Sum384(Sha3_384::default()),
            HashAlgorithm::Sum512 => Self::Sum512(Sha3_512::default()),
            HashAlgorithm::Shake128 => Self::Shake128(Shake128::default()),
            HashAlgorithm::Shake256 => Self::Shake256(Shake256::default()),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Sum224(_) => HashAlgorithm::Sum224,
            Self::Sum256(_) => HashAlgorithm::Sum256,
            Self::Sum384(_) => HashAlgorithm::Sum384,
            Self::Sum512(_) => HashAlgorithm::Sum512,
            Self::Shake128(_) => HashAlgorithm::Shake128,
            Self::Shake256(_) => HashAlgorithm::Shake256,
        }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sum224(h) => h.update(data),
            Self::Sum256(h) => h.update(data),
            Self::Sum384(h) => h.update(data),
            Self::Sum512(h) => h.update(data),
            Self::Shake128(h) => h.update(data),
            Self::Shake256(h) => h.update(data),
        }
    }

    /// Finalize into a digest.
    ///
    /// `output_length` is only read by the SHAKE variants.
    pub fn finalize(self, output_length: usize) -> Digest {
        match self {
            Self::Sum224(h) => Digest(h.finalize_fixed().to_vec()),
            Self::Sum256(h) => Digest(h.finalize_fixed().to_vec()),
            Self::Sum384(h) => Digest(h.finalize_fixed().to_vec()),
            Self::Sum512(h) => Digest(h.finalize_fixed().to_vec()),
            Self::Shake128(h) => squeeze(h.finalize_xof(), output_length),
            Self::Shake256(h) => squeeze(h.finalize_xof(), output_length),
        }
    }
}

fn squeeze(mut reader: impl XofReader, output_length: usize) -> Digest {
    let mut output = vec![0u8; output_length];
    reader.read(&mut output);
    Digest(output)
}

fn check_length(algorithm: HashAlgorithm, output_length: usize) -> Result<()> {
    if algorithm.is_extendable() && output_length == 0 {
        return Err(Sha3SumError::InvalidLength(output_length));
    }
    Ok(())
}

/// Feed a reader into a hasher until EOF
fn stream_into<R: Read>(reader: &mut R, hasher: &mut Hasher, buffer_size: usize) -> std::io::Result<u64> {
    let mut buffer = vec![0u8; buffer_size];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    Ok(total)
}

/// Digest a byte stream, reading it once from start to end
pub fn digest<R: Read>(mut reader: R, algorithm: HashAlgorithm, output_length: usize) -> Result<Digest> {
    check_length(algorithm, output_length)?;

    let mut hasher = Hasher::new(algorithm);
    stream_into(&mut reader, &mut hasher, DEFAULT_BUFFER_SIZE)
        .map_err(|e| Sha3SumError::io("<stream>", e))?;

    Ok(hasher.finalize(output_length))
}

/// Compute the digest of a file (`-` reads standard input)
pub fn hash_file(path: &Path, config: &HashConfig) -> Result<Digest> {
    check_length(config.algorithm, config.output_length)?;

    let input = open_input(path)?;
    let mut reader = BufReader::with_capacity(config.buffer_size, input);
    let mut hasher = Hasher::new(config.algorithm);

    let bytes = stream_into(&mut reader, &mut hasher, config.buffer_size)
        .map_err(|e| Sha3SumError::io(path, e))?;
    tracing::trace!(path = %path.display(), bytes, "hashed");

    Ok(hasher.finalize(config.output_length))
}

/// Compute the digest of data in memory
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm, output_length: usize) -> Result<Digest> {
    check_length(algorithm, output_length)?;

    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    Ok(hasher.finalize(output_length))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use tempfile::TempDir;

    const SHAKE256_EMPTY_64: &str = "46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f\
                                     d75dc4ddd8c0f200cb05019d67b592f6fc821c49479ab48640292eacb3b7c4be";

    fn empty_digest(algorithm: HashAlgorithm) -> &'static str {
        match algorithm {
            HashAlgorithm::Sum224 => "6b4e03423667dbb73b6e15454f0eb1abd4597f9a1b078e3f5b5a6bc7",
            HashAlgorithm::Sum256 => "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a",
            HashAlgorithm::Sum384 => {
                "0c63a75b845e4f7d01107d852e4c2485c51a50aaaa94fc61995e71bbee983a2a\
                 c3713831264adb47fb6bd1e058d5f004"
            }
            HashAlgorithm::Sum512 => {
                "a69f73cca23a9ac5c8b567dc185a756e97c982164fe25859e0d1dcc1475c80a6\
                 15b2123af1f5f94c11e3e9402c3ac558f500199d95b6d3e301758586281dcd26"
            }
            HashAlgorithm::Shake128 => "7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26",
            HashAlgorithm::Shake256 => &SHAKE256_EMPTY_64[..64],
        }
    }

    fn create_test_file(dir: &Path, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join("test.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    #[test]
    fn test_empty_input_constants() {
        for algorithm in HashAlgorithm::ALL {
            let digest = hash_bytes(b"", algorithm, 32).unwrap();
            assert_eq!(digest.to_hex(), empty_digest(algorithm), "{}", algorithm);
            assert_eq!(digest.len(), algorithm.output_size(32));
        }
    }

    #[test]
    fn test_known_vector() {
        let digest = hash_bytes(b"abc", HashAlgorithm::Sum256, 0).unwrap();
        assert_eq!(
            digest.to_hex(),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn test_shake_long_output() {
        let digest = hash_bytes(b"", HashAlgorithm::Shake256, 64).unwrap();
        assert_eq!(digest.to_hex(), SHAKE256_EMPTY_64);
    }

    #[test]
    fn test_zero_length_shake() {
        let err = hash_bytes(b"data", HashAlgorithm::Shake128, 0).unwrap_err();
        assert!(matches!(err, Sha3SumError::InvalidLength(0)));

        let err = digest(&b"data"[..], HashAlgorithm::Shake256, 0).unwrap_err();
        assert!(matches!(err, Sha3SumError::InvalidLength(0)));
    }

    #[test]
    fn test_hash_file_matches_bytes() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..200_000u32).map(|i| (i % 251) as u8).collect();
        let path = create_test_file(dir.path(), &content);

        // a small buffer forces many reads
        let config = HashConfig {
            algorithm: HashAlgorithm::Sum384,
            buffer_size: 1000,
            ..Default::default()
        };
        let from_file = hash_file(&path, &config).unwrap();
        let from_memory = hash_bytes(&content, HashAlgorithm::Sum384, 0).unwrap();

        assert_eq!(from_file, from_memory);
    }

    #[test]
    fn test_hash_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = hash_file(&missing, &HashConfig::default()).unwrap_err();
        assert!(matches!(err, Sha3SumError::Io { .. }));
        assert_eq!(err.path(), Some(missing.as_path()));
    }

    #[test]
    fn test_digest_length_sensitive_equality() {
        let short = hash_bytes(b"x", HashAlgorithm::Shake128, 16).unwrap();
        let long = hash_bytes(b"x", HashAlgorithm::Shake128, 32).unwrap();
        assert_ne!(short, long);
        assert_eq!(short.as_bytes(), &long.as_bytes()[..16]);
    }

    #[test]
    fn test_digest_hex_roundtrip() {
        let digest = Digest::from_hex("DEADbeef").unwrap();
        assert_eq!(digest.as_bytes(), &[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(digest.to_string(), "deadbeef");
        assert!(Digest::from_hex("abc").is_err());
        assert!(Digest::from_hex("zz").is_err());
    }

    proptest! {
        #[test]
        fn prop_chunked_updates_match(data in proptest::collection::vec(any::<u8>(), 0..4096), split in 0usize..4096) {
            let split = split.min(data.len());
            for algorithm in HashAlgorithm::ALL {
                let mut hasher = Hasher::new(algorithm);
                hasher.update(&data[..split]);
                hasher.update(&data[split..]);
                prop_assert_eq!(hasher.finalize(32), hash_bytes(&data, algorithm, 32).unwrap());
            }
        }

        #[test]
        fn prop_xof_prefix_stable(data in proptest::collection::vec(any::<u8>(), 0..1024), len in 1usize..256) {
            for algorithm in [HashAlgorithm::Shake128, HashAlgorithm::Shake256] {
                let short = hash_bytes(&data, algorithm, len).unwrap();
                let long = hash_bytes(&data, algorithm, len * 2).unwrap();
                prop_assert_eq!(short.len(), len);
                prop_assert_eq!(short.as_bytes(), &long.as_bytes()[..len]);
            }
        }

        #[test]
        fn prop_stream_matches_memory(data in proptest::collection::vec(any::<u8>(), 0..8192)) {
            let streamed = digest(&data[..], HashAlgorithm::Shake256, 48).unwrap();
            prop_assert_eq!(streamed, hash_bytes(&data, HashAlgorithm::Shake256, 48).unwrap());
        }
    }
}

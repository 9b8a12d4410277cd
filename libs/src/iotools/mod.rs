use crate::errors::{ArtifactError, Result};
use crate::group_structures::{G1Affine, G2Affine};
use ark_bls12_381::Fq;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

mod staged;

pub use staged::StagedWrites;

/// Evaluations file read next to the transcript.
pub const EVALUATIONS_FILE: &str = "evals";
/// Verifying key written by the extraction pipeline.
pub const VERIFYING_KEY_FILE: &str = "vk";
/// Proving keys are written as `pk0`, `pk1`, ...
pub const PROVING_KEY_PREFIX: &str = "pk";
/// Groth16 verifying key consumed by the export pipeline: `<session>.vk.save`.
pub const VK_SAVE_SUFFIX: &str = ".vk.save";
/// Generated verifier contract: `<session>.sol`.
pub const SOLIDITY_SUFFIX: &str = ".sol";

/// Reads a canonical (compressed) binary artifact into `Self`.
#[macro_export]
macro_rules! impl_read_from_binary {
    ($t:ty, $what:expr) => {
        impl $t {
            pub fn read_from_binary<P: AsRef<std::path::Path>>(path: P) -> $crate::errors::Result<Self> {
                let reader = $crate::iotools::open_buffered(path.as_ref())?;
                $crate::iotools::decode_compressed(reader, $what)
            }
        }
    };
}

/// Encodes `Self` into its canonical (compressed) binary form.
#[macro_export]
macro_rules! impl_write_into_binary {
    ($t:ty, $what:expr) => {
        impl $t {
            pub fn to_binary(&self) -> $crate::errors::Result<Vec<u8>> {
                $crate::iotools::encode_compressed(self, $what)
            }

            pub fn write_into_binary<P: AsRef<std::path::Path>>(&self, path: P) -> $crate::errors::Result<()> {
                let bytes = self.to_binary()?;
                std::fs::write(path.as_ref(), bytes)
                    .map_err(|e| $crate::errors::ArtifactError::stream(path.as_ref(), e))
            }
        }
    };
}

pub fn open_buffered(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| ArtifactError::stream(path, e))?;
    Ok(BufReader::new(file))
}

pub fn create_buffered(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| ArtifactError::stream(path, e))?;
    Ok(BufWriter::new(file))
}

pub fn decode_compressed<T: CanonicalDeserialize, R: Read>(reader: R, what: &'static str) -> Result<T> {
    T::deserialize_compressed(reader).map_err(|e| ArtifactError::decode(what, e))
}

pub fn encode_compressed<T: CanonicalSerialize + ?Sized>(value: &T, what: &'static str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(value.compressed_size());
    value
        .serialize_compressed(&mut bytes)
        .map_err(|e| ArtifactError::decode(what, e))?;
    Ok(bytes)
}

/// Metadata record at the start of a phase-2 transcript.
///
/// Encoded as 18 big-endian bytes: four `u32` counts followed by the `u16`
/// number of contributions. Nothing after the header is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TranscriptHeader {
    pub witness: u32,
    pub public: u32,
    pub constraints: u32,
    pub domain: u32,
    pub contributions: u16,
}

impl TranscriptHeader {
    pub const ENCODED_LEN: usize = 18;

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_fields(reader)
            .map_err(|e| ArtifactError::decode("transcript header", SerializationError::IoError(e)))
    }

    fn read_fields<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(TranscriptHeader {
            witness: reader.read_u32::<BigEndian>()?,
            public: reader.read_u32::<BigEndian>()?,
            constraints: reader.read_u32::<BigEndian>()?,
            domain: reader.read_u32::<BigEndian>()?,
            contributions: reader.read_u16::<BigEndian>()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<BigEndian>(self.witness)?;
        writer.write_u32::<BigEndian>(self.public)?;
        writer.write_u32::<BigEndian>(self.constraints)?;
        writer.write_u32::<BigEndian>(self.domain)?;
        writer.write_u16::<BigEndian>(self.contributions)
    }
}

/// Opens the transcript at `path` and decodes only its header.
pub fn read_transcript_header(path: &Path) -> Result<TranscriptHeader> {
    let mut reader = open_buffered(path)?;
    let header = TranscriptHeader::read(&mut reader)?;
    debug!(?path, ?header, "read transcript header");
    Ok(header)
}

pub fn decode_evaluation_basis<R: Read>(reader: R) -> Result<Vec<G1Affine>> {
    decode_compressed(reader, "evaluation basis")
}

pub fn read_evaluation_basis(path: &Path) -> Result<Vec<G1Affine>> {
    let reader = open_buffered(path)?;
    let basis = decode_evaluation_basis(reader)?;
    debug!(?path, points = basis.len(), "read evaluation basis");
    Ok(basis)
}

pub fn write_evaluation_basis(path: &Path, basis: &[G1Affine]) -> Result<()> {
    let bytes = encode_compressed(basis, "evaluation basis")?;
    let mut writer = create_buffered(path)?;
    writer
        .write_all(&bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| ArtifactError::stream(path, e))
}

/// File names of the extraction outputs inside one directory.
#[derive(Clone, Debug)]
pub struct ArtifactLayout {
    dir: PathBuf,
}

impl ArtifactLayout {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ArtifactLayout { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn verifying_key(&self) -> PathBuf {
        self.dir.join(VERIFYING_KEY_FILE)
    }

    pub fn proving_key(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}{}", PROVING_KEY_PREFIX, index))
    }
}

/// File names derived from a session name by appending fixed suffixes.
#[derive(Clone, Debug)]
pub struct SessionArtifacts {
    session: String,
}

impl SessionArtifacts {
    pub fn new<S: Into<String>>(session: S) -> Self {
        SessionArtifacts { session: session.into() }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn vk_save(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.session, VK_SAVE_SUFFIX))
    }

    pub fn solidity(&self) -> PathBuf {
        PathBuf::from(format!("{}{}", self.session, SOLIDITY_SUFFIX))
    }
}

// Helper function to encode a base field element as 48 big-endian bytes
pub fn base_field_to_be_bytes(value: &Fq) -> Vec<u8> {
    value.into_bigint().to_bytes_be()
}

// Helper function to split a base field element into part1 (16 bytes) and part2 (32 bytes),
// the two words of its 64-byte EIP-2537 encoding
pub fn split_base_field(value: &Fq) -> (String, String) {
    let bytes = base_field_to_be_bytes(value);
    let part1 = format!("0x{}", hex::encode(&bytes[0..16]));
    let part2 = format!("0x{}", hex::encode(&bytes[16..48]));
    (part1, part2)
}

/// `[x_part1, x_part2, y_part1, y_part2]`; the identity encodes as zeros.
pub fn split_g1(point: &G1Affine) -> [String; 4] {
    if point.infinity {
        return std::array::from_fn(|_| zero_word());
    }
    let (x1, x2) = split_base_field(&point.x);
    let (y1, y2) = split_base_field(&point.y);
    [x1, x2, y1, y2]
}

/// `[x.c0, x.c1, y.c0, y.c1]`, each as part1/part2; the identity encodes as zeros.
pub fn split_g2(point: &G2Affine) -> [String; 8] {
    if point.infinity {
        return std::array::from_fn(|_| zero_word());
    }
    let (xc0_1, xc0_2) = split_base_field(&point.x.c0);
    let (xc1_1, xc1_2) = split_base_field(&point.x.c1);
    let (yc0_1, yc0_2) = split_base_field(&point.y.c0);
    let (yc1_1, yc1_2) = split_base_field(&point.y.c1);
    [xc0_1, xc0_2, xc1_1, xc1_2, yc0_1, yc0_2, yc1_1, yc1_2]
}

fn zero_word() -> String {
    "0x0".to_string()
}

pub(crate) fn parent_dir(target: &Path) -> &Path {
    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Creates a temporary file next to `target` holding `bytes`.
pub(crate) fn stage_file(target: &Path, bytes: &[u8]) -> Result<NamedTempFile> {
    let dir = parent_dir(target);
    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| ArtifactError::stream(dir, e))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| ArtifactError::stream(target, e))?;
    Ok(tmp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::Fr;
    use ark_ec::{AffineRepr, CurveGroup};
    use std::io::Cursor;

    fn header() -> TranscriptHeader {
        TranscriptHeader { witness: 10, public: 2, constraints: 3, domain: 4, contributions: 7 }
    }

    #[test]
    fn test_header_layout_is_big_endian() {
        let mut bytes = Vec::new();
        header().write(&mut bytes).unwrap();
        assert_eq!(bytes.len(), TranscriptHeader::ENCODED_LEN);
        assert_eq!(&bytes[12..16], &[0, 0, 0, 4]);
        assert_eq!(&bytes[16..], &[0, 7]);

        let read = TranscriptHeader::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(read, header());
    }

    #[test]
    fn test_header_from_literal_bytes() {
        let bytes: [u8; 20] = [
            0x00, 0x01, 0x02, 0x03, // witness
            0x00, 0x00, 0x00, 0x05, // public
            0x00, 0x00, 0x01, 0x00, // constraints
            0x00, 0x00, 0x04, 0x00, // domain
            0x01, 0x02, // contributions
            0xde, 0xad, // transcript body
        ];
        let mut reader = Cursor::new(&bytes[..]);
        let read = TranscriptHeader::read(&mut reader).unwrap();
        assert_eq!(
            read,
            TranscriptHeader {
                witness: 0x0001_0203,
                public: 5,
                constraints: 256,
                domain: 1024,
                contributions: 0x0102,
            }
        );
        assert_eq!(reader.position() as usize, TranscriptHeader::ENCODED_LEN);
    }

    #[test]
    fn test_header_ignores_trailing_transcript() {
        let mut bytes = Vec::new();
        header().write(&mut bytes).unwrap();
        bytes.extend_from_slice(&[0xff; 64]);
        let read = TranscriptHeader::read(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(read, header());
    }

    #[test]
    fn test_truncated_header_is_decode_error() {
        let mut bytes = Vec::new();
        header().write(&mut bytes).unwrap();
        bytes.truncate(TranscriptHeader::ENCODED_LEN - 1);
        let err = TranscriptHeader::read(&mut Cursor::new(&bytes)).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { what: "transcript header", .. }));
    }

    #[test]
    fn test_truncated_basis_is_decode_error() {
        let basis: Vec<G1Affine> = (1..=3u64)
            .map(|k| (G1Affine::generator() * Fr::from(k)).into_affine())
            .collect();
        let mut bytes = encode_compressed(basis.as_slice(), "evaluation basis").unwrap();
        bytes.truncate(bytes.len() - 5);
        let err = decode_evaluation_basis(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { .. }));
    }

    #[test]
    fn test_invalid_point_is_decode_error() {
        // length prefix of one followed by a compressed point that is not on the curve
        let mut bytes = 1u64.to_le_bytes().to_vec();
        bytes.extend_from_slice(&[0x9a; 48]);
        let err = decode_evaluation_basis(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, ArtifactError::Decode { .. }));
    }

    #[test]
    fn test_missing_file_is_stream_error() {
        let err = read_transcript_header(Path::new("definitely/not/here/phase2")).unwrap_err();
        assert!(matches!(err, ArtifactError::Stream { .. }));
    }

    #[test]
    fn test_naming_contract() {
        let layout = ArtifactLayout::new("out");
        assert_eq!(layout.verifying_key(), Path::new("out").join("vk"));
        assert_eq!(layout.proving_key(0), Path::new("out").join("pk0"));
        assert_eq!(layout.proving_key(12), Path::new("out").join("pk12"));

        let session = SessionArtifacts::new("semaphore");
        assert_eq!(session.vk_save(), PathBuf::from("semaphore.vk.save"));
        assert_eq!(session.solidity(), PathBuf::from("semaphore.sol"));
    }

    #[test]
    fn test_split_g1_generator() {
        let words = split_g1(&G1Affine::generator());
        // x of the BLS12-381 G1 generator starts with 0x17f1d3a7...
        assert_eq!(words[0].len(), 2 + 32);
        assert_eq!(words[1].len(), 2 + 64);
        assert!(words[0].starts_with("0x17f1d3a7"));
    }

    #[test]
    fn test_split_identity_is_zero() {
        assert!(split_g1(&G1Affine::zero()).iter().all(|w| w == "0x0"));
        assert!(split_g2(&G2Affine::zero()).iter().all(|w| w == "0x0"));
    }
}

//! The EncryptedContent envelope used by name-based access control:
//! an encrypted payload together with the algorithm, key locator and
//! optional initialization vector needed to decrypt it.

use ndnwire_common::{encrypt_type, tlv_type};
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::signature::KeyLocator;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptAlgorithmType {
    AesEcb,
    AesCbc,
    RsaPkcs,
    RsaOaep,
}

impl EncryptAlgorithmType {
    pub fn code(&self) -> u64 {
        match self {
            EncryptAlgorithmType::AesEcb => 0,
            EncryptAlgorithmType::AesCbc => 1,
            EncryptAlgorithmType::RsaPkcs => 2,
            EncryptAlgorithmType::RsaOaep => 3,
        }
    }

    pub fn from_code(code: u64) -> Result<Self, TlvError> {
        match code {
            0 => Ok(EncryptAlgorithmType::AesEcb),
            1 => Ok(EncryptAlgorithmType::AesCbc),
            2 => Ok(EncryptAlgorithmType::RsaPkcs),
            3 => Ok(EncryptAlgorithmType::RsaOaep),
            other => Err(TlvError::UnrecognizedEncryptionAlgorithm(other)),
        }
    }
}

/// An encrypted payload, typically carried as Data content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedContent {
    algorithm_type: EncryptAlgorithmType,
    key_locator: Option<KeyLocator>,
    initial_vector: Option<Blob>,
    payload: Blob,
}

impl EncryptedContent {
    pub fn new(algorithm_type: EncryptAlgorithmType, payload: impl Into<Blob>) -> Self {
        Self {
            algorithm_type,
            key_locator: None,
            initial_vector: None,
            payload: payload.into(),
        }
    }

    pub fn algorithm_type(&self) -> EncryptAlgorithmType {
        self.algorithm_type
    }

    pub fn key_locator(&self) -> Option<&KeyLocator> {
        self.key_locator.as_ref()
    }

    pub fn set_key_locator(&mut self, key_locator: Option<KeyLocator>) -> &mut Self {
        self.key_locator = key_locator;
        self
    }

    pub fn initial_vector(&self) -> Option<&Blob> {
        self.initial_vector.as_ref()
    }

    pub fn set_initial_vector(&mut self, initial_vector: Option<Blob>) -> &mut Self {
        self.initial_vector = initial_vector;
        self
    }

    pub fn payload(&self) -> &Blob {
        &self.payload
    }

    pub fn set_payload(&mut self, payload: impl Into<Blob>) -> &mut Self {
        self.payload = payload.into();
        self
    }

    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        let save_length = encoder.len();
        encoder.write_blob_tlv(encrypt_type::ENCRYPTED_PAYLOAD, self.payload.as_slice())?;
        encoder.write_optional_blob_tlv(
            encrypt_type::INITIAL_VECTOR,
            self.initial_vector.as_ref().map(|iv| iv.as_slice()),
        )?;
        encoder.write_non_negative_integer_tlv(
            encrypt_type::ENCRYPTION_ALGORITHM,
            self.algorithm_type.code(),
        )?;
        KeyLocator::encode_tlv(self.key_locator.as_ref(), tlv_type::KEY_LOCATOR, &mut encoder)?;
        encoder.write_type_and_length(
            encrypt_type::ENCRYPTED_CONTENT,
            encoder.len() - save_length,
        )?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let end_offset = decoder.read_nested_tlvs_start(encrypt_type::ENCRYPTED_CONTENT)?;
        let key_locator = KeyLocator::decode_tlv(tlv_type::KEY_LOCATOR, &mut decoder)?;
        let algorithm_type = EncryptAlgorithmType::from_code(
            decoder.read_non_negative_integer_tlv(encrypt_type::ENCRYPTION_ALGORITHM)?,
        )?;
        let initial_vector =
            decoder.read_optional_blob_tlv(encrypt_type::INITIAL_VECTOR, end_offset)?;
        let payload = decoder.read_blob_tlv(encrypt_type::ENCRYPTED_PAYLOAD)?;
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(Self {
            algorithm_type,
            key_locator,
            initial_vector,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::name::Name;
    use ndnwire_common::AES_128_BLOCK_SIZE;

    #[test]
    fn test_aes_cbc_round_trip() {
        let mut content = EncryptedContent::new(EncryptAlgorithmType::AesCbc, &[0xe0u8; 48][..]);
        content
            .set_key_locator(Some(KeyLocator::KeyName(
                Name::from_uri("/access/group/C-KEY/1").unwrap(),
            )))
            .set_initial_vector(Some(Blob::from(vec![0x1cu8; AES_128_BLOCK_SIZE])));
        let encoded = content.encode().unwrap();
        let decoded = EncryptedContent::decode(&encoded).unwrap();
        assert_eq!(decoded, content);
    }

    #[test]
    fn test_rsa_oaep_without_iv() {
        let mut content = EncryptedContent::new(EncryptAlgorithmType::RsaOaep, &[7u8; 128][..]);
        content.set_key_locator(Some(KeyLocator::KeyName(
            Name::from_uri("/user/KEY/rsa").unwrap(),
        )));
        let decoded = EncryptedContent::decode(&content.encode().unwrap()).unwrap();
        assert_eq!(decoded.initial_vector(), None);
        assert_eq!(decoded.algorithm_type(), EncryptAlgorithmType::RsaOaep);
    }

    #[test]
    fn test_unrecognized_algorithm() {
        let mut content = EncryptedContent::new(EncryptAlgorithmType::AesEcb, &[1u8, 2][..]);
        content.set_key_locator(None);
        let encoded = content.encode().unwrap();
        // Rewrite the algorithm code to an unknown value.
        let mut bytes = encoded.to_vec();
        let position = bytes
            .iter()
            .position(|&byte| byte == 131)
            .expect("algorithm TLV present");
        bytes[position + 2] = 9;
        assert_eq!(
            EncryptedContent::decode(&Blob::from(bytes)),
            Err(TlvError::UnrecognizedEncryptionAlgorithm(9))
        );
    }
}

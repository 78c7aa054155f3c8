//! Forwarder management encodings: ControlParameters carried in
//! command Interests and the ControlResponse returned in reply Data.

use ndnwire_common::control_type;
use serde::{Deserialize, Serialize};

use crate::blob::Blob;
use crate::name::Name;
use crate::tlv::{TlvDecoder, TlvEncoder, TlvError};

/// Arguments of a forwarder command such as a route registration.
/// Every field is optional; which ones a command requires is up to the
/// management protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlParameters {
    name: Option<Name>,
    face_id: Option<u64>,
    uri: Option<String>,
    local_control_feature: Option<u64>,
    origin: Option<u64>,
    cost: Option<u64>,
    flags: Option<u64>,
    strategy: Option<Name>,
    expiration_period_ms: Option<u64>,
}

impl ControlParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&Name> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: Option<Name>) -> &mut Self {
        self.name = name;
        self
    }

    pub fn face_id(&self) -> Option<u64> {
        self.face_id
    }

    pub fn set_face_id(&mut self, face_id: Option<u64>) -> &mut Self {
        self.face_id = face_id;
        self
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    pub fn set_uri(&mut self, uri: Option<String>) -> &mut Self {
        self.uri = uri;
        self
    }

    pub fn local_control_feature(&self) -> Option<u64> {
        self.local_control_feature
    }

    pub fn set_local_control_feature(&mut self, value: Option<u64>) -> &mut Self {
        self.local_control_feature = value;
        self
    }

    pub fn origin(&self) -> Option<u64> {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Option<u64>) -> &mut Self {
        self.origin = origin;
        self
    }

    pub fn cost(&self) -> Option<u64> {
        self.cost
    }

    pub fn set_cost(&mut self, cost: Option<u64>) -> &mut Self {
        self.cost = cost;
        self
    }

    /// Registration flags; see
    /// [`registration_flag`](ndnwire_common::registration_flag) for the
    /// bit values.
    pub fn flags(&self) -> Option<u64> {
        self.flags
    }

    pub fn set_flags(&mut self, flags: Option<u64>) -> &mut Self {
        self.flags = flags;
        self
    }

    pub fn strategy(&self) -> Option<&Name> {
        self.strategy.as_ref()
    }

    pub fn set_strategy(&mut self, strategy: Option<Name>) -> &mut Self {
        self.strategy = strategy;
        self
    }

    pub fn expiration_period_ms(&self) -> Option<u64> {
        self.expiration_period_ms
    }

    pub fn set_expiration_period_ms(&mut self, value: Option<u64>) -> &mut Self {
        self.expiration_period_ms = value;
        self
    }

    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        self.encode_tlv(&mut encoder)?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        Self::decode_tlv(&mut decoder)
    }

    pub(crate) fn encode_tlv(&self, encoder: &mut TlvEncoder) -> Result<(), TlvError> {
        let save_length = encoder.len();
        encoder.write_optional_non_negative_integer_tlv(
            control_type::EXPIRATION_PERIOD,
            self.expiration_period_ms,
        )?;
        if let Some(strategy) = &self.strategy {
            let strategy_save_length = encoder.len();
            strategy.encode_tlv(encoder)?;
            encoder.write_type_and_length(
                control_type::STRATEGY,
                encoder.len() - strategy_save_length,
            )?;
        }
        encoder.write_optional_non_negative_integer_tlv(control_type::FLAGS, self.flags)?;
        encoder.write_optional_non_negative_integer_tlv(control_type::COST, self.cost)?;
        encoder.write_optional_non_negative_integer_tlv(control_type::ORIGIN, self.origin)?;
        encoder.write_optional_non_negative_integer_tlv(
            control_type::LOCAL_CONTROL_FEATURE,
            self.local_control_feature,
        )?;
        if let Some(uri) = &self.uri {
            encoder.write_blob_tlv(control_type::URI, uri.as_bytes())?;
        }
        encoder.write_optional_non_negative_integer_tlv(control_type::FACE_ID, self.face_id)?;
        if let Some(name) = &self.name {
            name.encode_tlv(encoder)?;
        }
        encoder.write_type_and_length(
            control_type::CONTROL_PARAMETERS,
            encoder.len() - save_length,
        )
    }

    pub(crate) fn decode_tlv(decoder: &mut TlvDecoder) -> Result<Self, TlvError> {
        use ndnwire_common::tlv_type;

        let end_offset = decoder.read_nested_tlvs_start(control_type::CONTROL_PARAMETERS)?;
        let mut parameters = ControlParameters::new();
        if decoder.peek_type(end_offset)? == Some(tlv_type::NAME) {
            let (name, _, _) = Name::decode_tlv(decoder)?;
            parameters.name = Some(name);
        }
        parameters.face_id =
            decoder.read_optional_non_negative_integer_tlv(control_type::FACE_ID, end_offset)?;
        if let Some(uri) = decoder.read_optional_blob_tlv(control_type::URI, end_offset)? {
            parameters.uri = Some(
                String::from_utf8(uri.to_vec()).map_err(|_| TlvError::InvalidUtf8)?,
            );
        }
        parameters.local_control_feature = decoder.read_optional_non_negative_integer_tlv(
            control_type::LOCAL_CONTROL_FEATURE,
            end_offset,
        )?;
        parameters.origin =
            decoder.read_optional_non_negative_integer_tlv(control_type::ORIGIN, end_offset)?;
        parameters.cost =
            decoder.read_optional_non_negative_integer_tlv(control_type::COST, end_offset)?;
        parameters.flags =
            decoder.read_optional_non_negative_integer_tlv(control_type::FLAGS, end_offset)?;
        if decoder.peek_type(end_offset)? == Some(control_type::STRATEGY) {
            let strategy_end = decoder.read_nested_tlvs_start(control_type::STRATEGY)?;
            let (strategy, _, _) = Name::decode_tlv(decoder)?;
            decoder.finish_nested_tlvs(strategy_end)?;
            parameters.strategy = Some(strategy);
        }
        parameters.expiration_period_ms = decoder
            .read_optional_non_negative_integer_tlv(control_type::EXPIRATION_PERIOD, end_offset)?;
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(parameters)
    }
}

/// The status and optional body of a forwarder command reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlResponse {
    status_code: u64,
    status_text: String,
    body: Option<ControlParameters>,
}

impl ControlResponse {
    pub fn new(status_code: u64, status_text: impl Into<String>) -> Self {
        Self {
            status_code,
            status_text: status_text.into(),
            body: None,
        }
    }

    pub fn status_code(&self) -> u64 {
        self.status_code
    }

    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    pub fn body(&self) -> Option<&ControlParameters> {
        self.body.as_ref()
    }

    pub fn set_body(&mut self, body: Option<ControlParameters>) -> &mut Self {
        self.body = body;
        self
    }

    pub fn encode(&self) -> Result<Blob, TlvError> {
        let mut encoder = TlvEncoder::new();
        let save_length = encoder.len();
        if let Some(body) = &self.body {
            body.encode_tlv(&mut encoder)?;
        }
        encoder.write_blob_tlv(control_type::STATUS_TEXT, self.status_text.as_bytes())?;
        encoder.write_non_negative_integer_tlv(control_type::STATUS_CODE, self.status_code)?;
        encoder
            .write_type_and_length(control_type::CONTROL_RESPONSE, encoder.len() - save_length)?;
        Ok(encoder.finish())
    }

    pub fn decode(input: &Blob) -> Result<Self, TlvError> {
        let mut decoder = TlvDecoder::new(input);
        let end_offset = decoder.read_nested_tlvs_start(control_type::CONTROL_RESPONSE)?;
        let status_code = decoder.read_non_negative_integer_tlv(control_type::STATUS_CODE)?;
        let status_text = String::from_utf8(
            decoder.read_blob_tlv(control_type::STATUS_TEXT)?.to_vec(),
        )
        .map_err(|_| TlvError::InvalidUtf8)?;
        let body = if decoder.peek_type(end_offset)? == Some(control_type::CONTROL_PARAMETERS) {
            Some(ControlParameters::decode_tlv(&mut decoder)?)
        } else {
            None
        };
        decoder.finish_nested_tlvs(end_offset)?;
        Ok(Self {
            status_code,
            status_text,
            body,
        })
    }
}

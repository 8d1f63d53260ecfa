use derive_builder::Builder;
use yao_circuits::{circuits, Circuit, CircuitError};
use yao_core::LABEL_LEN;
use yao_ot_core::{OtConfig, OtConfigBuilderError};

const DEFAULT_SUB_VECTOR_LEN: usize = 10;
const DEFAULT_MAGNITUDE_BITS: usize = 4;
const DEFAULT_OUTPUT_BITS: usize = 16;
const DEFAULT_OT_MODULUS_BITS: usize = 2048;
const DEFAULT_MAX_ATTEMPTS: usize = 1;

/// Largest supported magnitude width.
const MAX_MAGNITUDE_BITS: usize = 16;
/// Largest supported output width, results are decoded into an `i64`.
const MAX_OUTPUT_BITS: usize = 63;

/// Dot product protocol configuration.
///
/// Both parties must use the same configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct ProtocolConfig {
    /// Number of vector entries processed by one garbled circuit.
    #[builder(default = "DEFAULT_SUB_VECTOR_LEN")]
    sub_vector_len: usize,
    /// Width of a quantized magnitude.
    #[builder(default = "DEFAULT_MAGNITUDE_BITS")]
    magnitude_bits: usize,
    /// Width of the two's complement partial sum computed by the circuit.
    #[builder(default = "DEFAULT_OUTPUT_BITS")]
    output_bits: usize,
    /// Bit length of the RSA modulus used for oblivious transfer.
    #[builder(default = "DEFAULT_OT_MODULUS_BITS")]
    ot_modulus_bits: usize,
    /// Number of attempts per sub-vector exchange before giving up.
    #[builder(default = "DEFAULT_MAX_ATTEMPTS")]
    max_attempts: usize,
}

impl ProtocolConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let sub_vector_len = self.sub_vector_len.unwrap_or(DEFAULT_SUB_VECTOR_LEN);
        let magnitude_bits = self.magnitude_bits.unwrap_or(DEFAULT_MAGNITUDE_BITS);
        let output_bits = self.output_bits.unwrap_or(DEFAULT_OUTPUT_BITS);
        let ot_modulus_bits = self.ot_modulus_bits.unwrap_or(DEFAULT_OT_MODULUS_BITS);
        let max_attempts = self.max_attempts.unwrap_or(DEFAULT_MAX_ATTEMPTS);

        if sub_vector_len == 0 {
            return Err("sub-vector length must be non-zero".to_string());
        }

        if !(1..=MAX_MAGNITUDE_BITS).contains(&magnitude_bits) {
            return Err(format!(
                "magnitude width must be in 1..={MAX_MAGNITUDE_BITS}, got {magnitude_bits}"
            ));
        }

        if output_bits > MAX_OUTPUT_BITS {
            return Err(format!(
                "output width must not exceed {MAX_OUTPUT_BITS}, got {output_bits}"
            ));
        }

        // The largest partial sum must be representable.
        let max_term = ((1u128 << magnitude_bits) - 1).pow(2);
        let max_sum = max_term * sub_vector_len as u128;
        if output_bits <= 2 * magnitude_bits || max_sum >= 1u128 << (output_bits - 1) {
            return Err(format!(
                "{output_bits}-bit output can not hold a sum of {sub_vector_len} {magnitude_bits}-bit products"
            ));
        }

        if ot_modulus_bits <= 8 * LABEL_LEN {
            return Err(format!(
                "a {ot_modulus_bits}-bit modulus can not carry {LABEL_LEN}-byte labels"
            ));
        }

        if max_attempts == 0 {
            return Err("at least one attempt is required".to_string());
        }

        Ok(())
    }
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            sub_vector_len: DEFAULT_SUB_VECTOR_LEN,
            magnitude_bits: DEFAULT_MAGNITUDE_BITS,
            output_bits: DEFAULT_OUTPUT_BITS,
            ot_modulus_bits: DEFAULT_OT_MODULUS_BITS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl ProtocolConfig {
    /// Creates a new builder for ProtocolConfig.
    pub fn builder() -> ProtocolConfigBuilder {
        ProtocolConfigBuilder::default()
    }

    /// Returns the number of vector entries processed by one garbled circuit.
    pub fn sub_vector_len(&self) -> usize {
        self.sub_vector_len
    }

    /// Returns the width of a quantized magnitude.
    pub fn magnitude_bits(&self) -> usize {
        self.magnitude_bits
    }

    /// Returns the width of a partial sum.
    pub fn output_bits(&self) -> usize {
        self.output_bits
    }

    /// Returns the bit length of the OT modulus.
    pub fn ot_modulus_bits(&self) -> usize {
        self.ot_modulus_bits
    }

    /// Returns the number of attempts per sub-vector exchange.
    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    /// Returns the oblivious transfer configuration for label transfers.
    pub(crate) fn ot_config(&self) -> Result<OtConfig, OtConfigBuilderError> {
        OtConfig::builder()
            .modulus_bits(self.ot_modulus_bits)
            .msg_len(LABEL_LEN)
            .build()
    }

    /// Builds the circuit evaluated on every sub-vector.
    pub(crate) fn circuit(&self) -> Result<Circuit, CircuitError> {
        circuits::dot_product(self.sub_vector_len, self.magnitude_bits, self.output_bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProtocolConfig::builder().build().unwrap();

        assert_eq!(config.sub_vector_len(), 10);
        assert_eq!(config.magnitude_bits(), 4);
        assert_eq!(config.output_bits(), 16);
        assert_eq!(config.ot_modulus_bits(), 2048);
        assert_eq!(config.max_attempts(), 1);
        assert!(config.ot_config().is_ok());
    }

    #[test]
    fn test_output_too_narrow() {
        // 10 * 15^2 = 2250 does not fit into 12 signed bits.
        assert!(ProtocolConfig::builder().output_bits(12).build().is_err());
        assert!(ProtocolConfig::builder()
            .sub_vector_len(4)
            .output_bits(12)
            .build()
            .is_ok());
    }

    #[test]
    fn test_invalid_values() {
        assert!(ProtocolConfig::builder().sub_vector_len(0).build().is_err());
        assert!(ProtocolConfig::builder().magnitude_bits(0).build().is_err());
        assert!(ProtocolConfig::builder().ot_modulus_bits(256).build().is_err());
        assert!(ProtocolConfig::builder().max_attempts(0).build().is_err());
    }
}

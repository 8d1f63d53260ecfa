use derive_builder::Builder;

const DEFAULT_MODULUS_BITS: usize = 2048;
const DEFAULT_MSG_LEN: usize = yao_core::LABEL_LEN;

/// Oblivious transfer configuration.
#[derive(Debug, Clone, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct OtConfig {
    /// Bit length of the RSA modulus generated for every transfer.
    #[builder(default = "DEFAULT_MODULUS_BITS")]
    modulus_bits: usize,
    /// Length of every transferred message in bytes.
    #[builder(default = "DEFAULT_MSG_LEN")]
    msg_len: usize,
}

impl OtConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        let modulus_bits = self.modulus_bits.unwrap_or(DEFAULT_MODULUS_BITS);
        let msg_len = self.msg_len.unwrap_or(DEFAULT_MSG_LEN);

        if msg_len == 0 {
            return Err("message length must be non-zero".to_string());
        }

        if msg_len * 8 >= modulus_bits {
            return Err(format!(
                "a {modulus_bits}-bit modulus can not carry {msg_len}-byte messages"
            ));
        }

        Ok(())
    }
}

impl Default for OtConfig {
    fn default() -> Self {
        Self {
            modulus_bits: DEFAULT_MODULUS_BITS,
            msg_len: DEFAULT_MSG_LEN,
        }
    }
}

impl OtConfig {
    /// Creates a new builder for OtConfig.
    pub fn builder() -> OtConfigBuilder {
        OtConfigBuilder::default()
    }

    /// Returns the bit length of the RSA modulus.
    pub fn modulus_bits(&self) -> usize {
        self.modulus_bits
    }

    /// Returns the length of every transferred message in bytes.
    pub fn msg_len(&self) -> usize {
        self.msg_len
    }
}

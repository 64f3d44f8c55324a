use soroban_sdk::{contracttype, BytesN, Env, Vec};

/// A BN254 G1 point as two 32-byte big-endian coordinates.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct G1Point {
    pub x: BytesN<32>,
    pub y: BytesN<32>,
}

/// A BN254 G2 point. Each coordinate is an Fq2 element stored imaginary part
/// first, matching the EIP-197 layout the host pairing functions consume.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct G2Point {
    pub x: (BytesN<32>, BytesN<32>),
    pub y: (BytesN<32>, BytesN<32>),
}

/// Uncompressed Groth16 proof points.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Proof {
    pub a: G1Point,
    pub b: G2Point,
    pub c: G1Point,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProofValidationError {
    ZeroedComponent,
    OversizedComponent,
    MalformedG1PointA,
    MalformedG1PointC,
    MalformedG2Point,
    EmptyPublicInputs,
}

fn bytes_all_zero(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0)
}

fn bytes_all_ff(bytes: &[u8]) -> bool {
    bytes.iter().all(|&b| b == 0xFF)
}

fn word(bytes: &[u8], offset: usize) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes[offset..offset + 32]);
    out
}

impl G1Point {
    pub fn from_array(env: &Env, bytes: &[u8; 64]) -> Self {
        G1Point {
            x: BytesN::from_array(env, &word(bytes, 0)),
            y: BytesN::from_array(env, &word(bytes, 32)),
        }
    }

    pub fn to_array(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[0..32].copy_from_slice(&self.x.to_array());
        out[32..64].copy_from_slice(&self.y.to_array());
        out
    }

    fn is_all_zeros(&self) -> bool {
        bytes_all_zero(&self.to_array())
    }

    fn is_all_ones(&self) -> bool {
        bytes_all_ff(&self.to_array())
    }

    fn has_zero_coordinate(&self) -> bool {
        bytes_all_zero(&self.x.to_array()) || bytes_all_zero(&self.y.to_array())
    }
}

impl G2Point {
    pub fn from_array(env: &Env, bytes: &[u8; 128]) -> Self {
        G2Point {
            x: (
                BytesN::from_array(env, &word(bytes, 0)),
                BytesN::from_array(env, &word(bytes, 32)),
            ),
            y: (
                BytesN::from_array(env, &word(bytes, 64)),
                BytesN::from_array(env, &word(bytes, 96)),
            ),
        }
    }

    pub fn to_array(&self) -> [u8; 128] {
        let mut out = [0u8; 128];
        out[0..32].copy_from_slice(&self.x.0.to_array());
        out[32..64].copy_from_slice(&self.x.1.to_array());
        out[64..96].copy_from_slice(&self.y.0.to_array());
        out[96..128].copy_from_slice(&self.y.1.to_array());
        out
    }
}

impl Proof {
    /// Assemble a proof from raw uncompressed point encodings.
    pub fn from_arrays(env: &Env, a: &[u8; 64], b: &[u8; 128], c: &[u8; 64]) -> Self {
        Proof {
            a: G1Point::from_array(env, a),
            b: G2Point::from_array(env, b),
            c: G1Point::from_array(env, c),
        }
    }

    /// Reject known-bad byte patterns before any curve arithmetic runs.
    ///
    /// Points that pass may still be off-curve; the host rejects those during
    /// the pairing check.
    pub fn validate_components(
        &self,
        public_signals: &Vec<BytesN<32>>,
    ) -> Result<(), ProofValidationError> {
        if self.a.is_all_zeros() {
            return Err(ProofValidationError::ZeroedComponent);
        }
        if self.a.is_all_ones() {
            return Err(ProofValidationError::OversizedComponent);
        }
        if self.a.has_zero_coordinate() {
            return Err(ProofValidationError::MalformedG1PointA);
        }

        let b = self.b.to_array();
        if bytes_all_zero(&b) {
            return Err(ProofValidationError::ZeroedComponent);
        }
        if bytes_all_ff(&b) {
            return Err(ProofValidationError::OversizedComponent);
        }
        // Neither Fq2 coordinate of a non-identity point is zero.
        if bytes_all_zero(&b[0..64]) || bytes_all_zero(&b[64..128]) {
            return Err(ProofValidationError::MalformedG2Point);
        }

        if self.c.is_all_zeros() {
            return Err(ProofValidationError::ZeroedComponent);
        }
        if self.c.is_all_ones() {
            return Err(ProofValidationError::OversizedComponent);
        }
        if self.c.has_zero_coordinate() {
            return Err(ProofValidationError::MalformedG1PointC);
        }

        if public_signals.is_empty() {
            return Err(ProofValidationError::EmptyPublicInputs);
        }

        Ok(())
    }
}

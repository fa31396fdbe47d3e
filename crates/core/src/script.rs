//! Lock/unlock scripts and the standard pay-to-pubkey-hash pattern.
//!
//! A script is a flat byte sequence of one-byte opcodes, some of which carry
//! an immediate operand. Only enough of the language is modelled here to build
//! the standard P2PKH scripts and to check a witness against that one pattern;
//! general execution is left to the ledger.
//!
//! The standard lock script expects the stack `[signature, public_key, public_key_hash]`
//! (the hash comes from the asset's lock parameters):
//!
//! ```text
//! COPY 0x01     ; duplicate the public key
//! BLAKE256      ; hash it
//! EQ            ; compare with the public key hash parameter
//! JZ 0xff       ; fail when they differ
//! CHKSIG        ; verify the signature with the public key
//! ```

use crate::crypto::{CryptoError, PublicKey, Signature};
use crate::hash::{blake160, blake256, H160, H256};
use crate::Bytes;
use thiserror::Error;

/// Errors produced while building or inspecting scripts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("unknown opcode 0x{0:02x} at offset {1}")]
    UnknownOpcode(u8, usize),
    #[error("script truncated at offset {0}")]
    Truncated(usize),
    #[error("cannot push {0} bytes in a single PUSHB")]
    PushTooLong(usize),
    #[error("lock script is not the standard P2PKH script")]
    NotStandard,
    #[error("unlock script must push exactly a signature and a public key")]
    MalformedUnlock,
    #[error("public key hash does not match the lock parameters")]
    PublicKeyHashMismatch,
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

/// Script opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    // Control (0x00-0x0F)
    NOP = 0x00,
    BURN = 0x01,
    SUCCESS = 0x02,
    FAIL = 0x03,

    // Logic (0x10-0x1F)
    NOT = 0x10,
    EQ = 0x11,

    // Flow (0x20-0x2F)
    JMP = 0x20,
    JNZ = 0x21,
    JZ = 0x22,

    // Stack (0x30-0x3F)
    PUSH = 0x30,
    POP = 0x31,
    PUSHB = 0x32,
    DUP = 0x33,
    SWAP = 0x34,
    COPY = 0x35,
    DROP = 0x36,

    // Signatures (0x80-0x8F)
    CHKSIG = 0x80,
    CHKMULTISIG = 0x81,

    // Hashing (0x90-0x9F)
    BLAKE256 = 0x90,
    SHA256 = 0x91,
    RIPEMD160 = 0x92,
    KECCAK256 = 0x93,
    BLAKE160 = 0x94,

    // Time (0xB0-0xBF)
    CHKTIMELOCK = 0xB0,
}

impl Opcode {
    /// Parse a byte as an opcode.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Opcode::NOP),
            0x01 => Some(Opcode::BURN),
            0x02 => Some(Opcode::SUCCESS),
            0x03 => Some(Opcode::FAIL),

            0x10 => Some(Opcode::NOT),
            0x11 => Some(Opcode::EQ),

            0x20 => Some(Opcode::JMP),
            0x21 => Some(Opcode::JNZ),
            0x22 => Some(Opcode::JZ),

            0x30 => Some(Opcode::PUSH),
            0x31 => Some(Opcode::POP),
            0x32 => Some(Opcode::PUSHB),
            0x33 => Some(Opcode::DUP),
            0x34 => Some(Opcode::SWAP),
            0x35 => Some(Opcode::COPY),
            0x36 => Some(Opcode::DROP),

            0x80 => Some(Opcode::CHKSIG),
            0x81 => Some(Opcode::CHKMULTISIG),

            0x90 => Some(Opcode::BLAKE256),
            0x91 => Some(Opcode::SHA256),
            0x92 => Some(Opcode::RIPEMD160),
            0x93 => Some(Opcode::KECCAK256),
            0x94 => Some(Opcode::BLAKE160),

            0xB0 => Some(Opcode::CHKTIMELOCK),

            _ => None,
        }
    }

    /// Number of immediate bytes following the opcode. `PUSHB` is handled
    /// separately because its operand length is itself an operand.
    fn immediate_len(self) -> usize {
        match self {
            Opcode::PUSH
            | Opcode::COPY
            | Opcode::JMP
            | Opcode::JNZ
            | Opcode::JZ
            | Opcode::CHKTIMELOCK => 1,
            _ => 0,
        }
    }
}

/// A decoded script instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// An opcode without operands.
    Op(Opcode),
    /// An opcode with a one-byte immediate operand.
    OpWithArg(Opcode, u8),
    /// `PUSHB len data`.
    PushBytes(Vec<u8>),
}

/// A script as a raw byte sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script(pub Vec<u8>);

impl Script {
    /// Create an empty script.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an opcode.
    pub fn append(&mut self, op: Opcode) -> &mut Self {
        self.0.push(op as u8);
        self
    }

    /// Append an opcode with its one-byte operand.
    pub fn append_with_arg(&mut self, op: Opcode, arg: u8) -> &mut Self {
        self.0.push(op as u8);
        self.0.push(arg);
        self
    }

    /// Append `PUSHB len data`.
    pub fn push_bytes(&mut self, data: &[u8]) -> Result<&mut Self, ScriptError> {
        let len = u8::try_from(data.len()).map_err(|_| ScriptError::PushTooLong(data.len()))?;
        self.0.push(Opcode::PUSHB as u8);
        self.0.push(len);
        self.0.extend_from_slice(data);
        Ok(self)
    }

    /// The standard P2PKH lock script.
    pub fn standard() -> Self {
        let mut script = Self::new();
        script
            .append_with_arg(Opcode::COPY, 0x01)
            .append(Opcode::BLAKE256)
            .append(Opcode::EQ)
            .append_with_arg(Opcode::JZ, 0xff)
            .append(Opcode::CHKSIG);
        script
    }

    /// Build the unlock script for the standard lock script.
    pub fn standard_unlock(signature: &Signature, public_key: &PublicKey) -> Self {
        let key = public_key.as_bytes();
        let mut script = Self::new();
        // Both items are far below the single-push limit.
        script.0.reserve(4 + Signature::LEN + PublicKey::LEN);
        for item in [&signature.0[..], &key[..]] {
            script.0.push(Opcode::PUSHB as u8);
            script.0.push(item.len() as u8);
            script.0.extend_from_slice(item);
        }
        script
    }

    /// Decode the script into instructions.
    pub fn decode(bytes: &[u8]) -> Result<Vec<Instruction>, ScriptError> {
        let mut instructions = Vec::new();
        let mut pc = 0;
        while pc < bytes.len() {
            let op = Opcode::from_byte(bytes[pc]).ok_or(ScriptError::UnknownOpcode(bytes[pc], pc))?;
            pc += 1;
            if op == Opcode::PUSHB {
                let len = *bytes.get(pc).ok_or(ScriptError::Truncated(pc))? as usize;
                pc += 1;
                let data = bytes.get(pc..pc + len).ok_or(ScriptError::Truncated(pc))?;
                instructions.push(Instruction::PushBytes(data.to_vec()));
                pc += len;
            } else if op.immediate_len() == 1 {
                let arg = *bytes.get(pc).ok_or(ScriptError::Truncated(pc))?;
                instructions.push(Instruction::OpWithArg(op, arg));
                pc += 1;
            } else {
                instructions.push(Instruction::Op(op));
            }
        }
        Ok(instructions)
    }

    /// Get the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the script, returning its bytes.
    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    /// Hash of the script, as carried by an asset's lock script hash.
    pub fn hash(&self) -> H160 {
        blake160(&self.0)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// The standard P2PKH lock script bytes.
pub fn standard_script() -> Bytes {
    Script::standard().into_bytes()
}

/// The hash of the standard P2PKH lock script.
pub fn standard_script_hash() -> H160 {
    Script::standard().hash()
}

/// Check a P2PKH witness without running a script interpreter.
///
/// Succeeds when `lock` is the standard script, `unlock` pushes exactly a
/// signature and a public key, the public key hashes to the single lock
/// parameter, and the signature is valid over `message`.
pub fn verify_standard(
    lock: &[u8],
    unlock: &[u8],
    parameters: &[Bytes],
    message: &H256,
) -> Result<(), ScriptError> {
    if lock != Script::standard().as_bytes() {
        return Err(ScriptError::NotStandard);
    }
    let (signature, public_key) = match Script::decode(unlock)?.as_slice() {
        [Instruction::PushBytes(sig), Instruction::PushBytes(key)] => {
            (Signature::from_slice(sig)?, PublicKey::from_slice(key)?)
        }
        _ => return Err(ScriptError::MalformedUnlock),
    };
    match parameters {
        [hash] if hash.as_slice() == blake256(&public_key.as_bytes()).as_bytes() => {}
        _ => return Err(ScriptError::PublicKeyHashMismatch),
    }
    public_key.verify(message.as_bytes(), &signature)?;
    Ok(())
}

use dcbor::prelude::*;

use crate::{Error, Float8E4M3};

// A value travels as a one-byte byte string holding the raw pattern, so the
// sign of zero and of NaN survive a round trip. dCBOR's numeric reduction
// would otherwise canonicalize both.

impl From<Float8E4M3> for CBOR {
    fn from(value: Float8E4M3) -> Self {
        let bits = [value.to_bits()];
        CBOR::from(ByteString::from(bits.as_slice()))
    }
}

impl TryFrom<CBOR> for Float8E4M3 {
    type Error = dcbor::Error;

    fn try_from(cbor: CBOR) -> dcbor::Result<Self> {
        let bs: ByteString =
            cbor.try_into().map_err(|_| dcbor::Error::WrongType)?;
        let data: &[u8] = bs.data().as_ref();
        match data {
            [bits] => Ok(Float8E4M3::from_bits(*bits)),
            data => Err(Error::InvalidLength(data.len()).into()),
        }
    }
}

//! Member records as seen through a [State].

use anyhow::{Context as _, Result};
use commonware_codec::{DecodeExt, Encode};
use lrps_types::{Key, Member, MemberId};

use crate::State;

/// Load a member record. A record that exists but does not decode is a fatal error.
pub fn load_member<S: State>(state: &S, id: &MemberId) -> Result<Option<Member>> {
    let Some(bytes) = state
        .get(&Key::Member(id.clone()).to_bytes())
        .with_context(|| format!("read member {id}"))?
    else {
        return Ok(None);
    };
    let member =
        Member::decode(bytes.as_slice()).with_context(|| format!("decode member {id}"))?;
    Ok(Some(member))
}

pub fn store_member<S: State>(state: &mut S, id: &MemberId, member: &Member) -> Result<()> {
    state
        .insert(Key::Member(id.clone()).to_bytes(), member.encode().to_vec())
        .with_context(|| format!("write member {id}"))
}

pub fn remove_member<S: State>(state: &mut S, id: &MemberId) -> Result<()> {
    state
        .delete(&Key::Member(id.clone()).to_bytes())
        .with_context(|| format!("delete member {id}"))
}

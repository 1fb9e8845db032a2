use super::types::Cue;
use crate::av::Sample;
use crate::error::{Result, VttError};
use crate::format::mp4::boxes::{append_box, BoxIter};
use crate::format::mp4::cue_box::{box_text, encode_additional_text, IDEN, STTG, VTTA};
use bytes::BytesMut;

/// Converts a parsed block into a sample.
///
/// A cue becomes a key frame whose payload is the cue text and whose side
/// data holds `iden`/`sttg` boxes for the identifier and settings. A comment
/// becomes a metadata sample holding a `vtta` box.
pub fn cue_to_sample(cue: &Cue) -> Result<Sample> {
    if cue.is_comment() {
        return Ok(Sample::from_metadata(encode_additional_text(
            &cue.comment_text(),
        )?));
    }

    let start = i64::try_from(cue.start_time).map_err(|_| {
        VttError::InvalidData(format!("cue start {} out of range", cue.start_time))
    })?;

    let mut side_data = BytesMut::new();
    if !cue.identifier.is_empty() {
        append_box(&mut side_data, IDEN, cue.identifier.as_bytes())?;
    }
    if !cue.settings.is_empty() {
        append_box(&mut side_data, STTG, cue.settings.as_bytes())?;
    }

    Ok(Sample::new(cue.payload_text().into_bytes(), true)
        .with_pts(start)
        .with_dts(start)
        .with_duration(cue.duration)
        .with_side_data(side_data.freeze()))
}

/// Inverse of [`cue_to_sample`].
pub fn sample_to_cue(sample: &Sample) -> Result<Cue> {
    if sample.is_end_of_stream() {
        return Err(VttError::InvalidData(
            "end of stream sample carries no cue".into(),
        ));
    }

    let mut cue = Cue::default();
    for raw in BoxIter::new(sample.side_data()) {
        let raw = raw?;
        match raw.tag {
            IDEN => cue.identifier = box_text(raw.tag, raw.content)?,
            STTG => cue.settings = box_text(raw.tag, raw.content)?,
            VTTA => {
                cue.comment = box_text(raw.tag, raw.content)?
                    .split('\n')
                    .map(String::from)
                    .collect()
            }
            other => {
                return Err(VttError::InvalidData(format!(
                    "unexpected {} box in cue side data",
                    other
                )))
            }
        }
    }

    if sample.is_metadata() {
        if !cue.is_comment() {
            return Err(VttError::InvalidData(
                "metadata sample without vtta box".into(),
            ));
        }
        return Ok(cue);
    }

    cue.start_time = u64::try_from(sample.pts()).map_err(|_| {
        VttError::InvalidData(format!("negative cue start {}", sample.pts()))
    })?;
    cue.duration = sample.duration() as u64;

    let text = std::str::from_utf8(sample.data())
        .map_err(|e| VttError::InvalidData(format!("cue text is not UTF-8: {}", e)))?;
    if !text.is_empty() {
        cue.payload = text.split('\n').map(String::from).collect();
    }
    Ok(cue)
}

//! WebVTT sample boxes as defined by ISO/IEC 14496-30.
//!
//! A cue is stored as a `vttc` box whose children carry the cue text
//! (`payl`), identifier (`iden`) and settings (`sttg`). The payload box is
//! always written first. Time ranges with no cue are stored as an empty
//! `vtte` box.

use super::boxes::{append_box, write_box_header, BoxIter, FourCC, BOX_HEADER_SIZE};
use crate::codec::webvtt::Cue;
use crate::error::{Result, VttError};
use bytes::{Bytes, BytesMut};

/// Cue box.
pub const VTTC: FourCC = FourCC::new(b"vttc");
/// Empty cue box.
pub const VTTE: FourCC = FourCC::new(b"vtte");
/// Additional text box, used for comment blocks.
pub const VTTA: FourCC = FourCC::new(b"vtta");
/// Cue payload.
pub const PAYL: FourCC = FourCC::new(b"payl");
/// Cue identifier.
pub const IDEN: FourCC = FourCC::new(b"iden");
/// Cue settings.
pub const STTG: FourCC = FourCC::new(b"sttg");

/// Encoded size of a [`VttEmptyCueBox`].
pub const EMPTY_CUE_BOX_SIZE: usize = BOX_HEADER_SIZE;

/// Contents of a `vttc` box. Timing lives in the enclosing sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VttCueBox {
    pub cue_text: String,
    pub cue_id: String,
    pub cue_settings: String,
}

impl VttCueBox {
    pub fn new(cue_text: impl Into<String>) -> Self {
        Self {
            cue_text: cue_text.into(),
            ..Default::default()
        }
    }

    /// Builds the box for a timed cue. Comment blocks have no cue box.
    pub fn from_cue(cue: &Cue) -> Result<Self> {
        if cue.is_comment() {
            return Err(VttError::InvalidData(
                "comment blocks cannot be stored in a vttc box".into(),
            ));
        }
        Ok(Self {
            cue_text: cue.payload_text(),
            cue_id: cue.identifier.clone(),
            cue_settings: cue.settings.clone(),
        })
    }

    /// Rebuilds a cue from the box and the timing of its sample.
    pub fn to_cue(&self, start_time: u64, duration: u64) -> Cue {
        let payload = if self.cue_text.is_empty() {
            Vec::new()
        } else {
            self.cue_text.split('\n').map(String::from).collect()
        };
        Cue {
            identifier: self.cue_id.clone(),
            start_time,
            duration,
            settings: self.cue_settings.clone(),
            payload,
            comment: Vec::new(),
        }
    }

    fn content_len(&self) -> usize {
        let child = |text: &str| BOX_HEADER_SIZE + text.len();
        let mut len = child(&self.cue_text);
        if !self.cue_id.is_empty() {
            len += child(&self.cue_id);
        }
        if !self.cue_settings.is_empty() {
            len += child(&self.cue_settings);
        }
        len
    }

    /// Total encoded size, header included.
    pub fn size(&self) -> usize {
        BOX_HEADER_SIZE + self.content_len()
    }

    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        buf.reserve(self.size());
        write_box_header(buf, VTTC, self.content_len())?;
        append_box(buf, PAYL, self.cue_text.as_bytes())?;
        if !self.cue_id.is_empty() {
            append_box(buf, IDEN, self.cue_id.as_bytes())?;
        }
        if !self.cue_settings.is_empty() {
            append_box(buf, STTG, self.cue_settings.as_bytes())?;
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.size());
        self.write_to(&mut buf)?;
        Ok(buf.freeze())
    }

    fn parse_content(content: &[u8]) -> Result<Self> {
        let mut cue_box = VttCueBox::default();
        let mut has_payload = false;
        for child in BoxIter::new(content) {
            let child = child?;
            match child.tag {
                PAYL => {
                    cue_box.cue_text = box_text(child.tag, child.content)?;
                    has_payload = true;
                }
                IDEN => cue_box.cue_id = box_text(child.tag, child.content)?,
                STTG => cue_box.cue_settings = box_text(child.tag, child.content)?,
                other => log::debug!("Skipping {} box inside vttc", other),
            }
        }
        if !has_payload {
            return Err(VttError::InvalidData("vttc box without payl box".into()));
        }
        Ok(cue_box)
    }
}

/// The `vtte` box marking a time range without cues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VttEmptyCueBox;

impl VttEmptyCueBox {
    pub fn write_to(&self, buf: &mut BytesMut) -> Result<()> {
        write_box_header(buf, VTTE, 0)
    }

    pub fn to_bytes(&self) -> Bytes {
        Bytes::from_static(&[0, 0, 0, 8, b'v', b't', b't', b'e'])
    }
}

/// A decoded top-level WebVTT sample box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueBox {
    Cue(VttCueBox),
    Empty,
}

/// Encodes a timed cue as a `vttc` box.
pub fn encode_cue(cue: &Cue) -> Result<Bytes> {
    VttCueBox::from_cue(cue)?.to_bytes()
}

/// Decodes exactly one `vttc` or `vtte` box.
pub fn decode_cue_box(data: &[u8]) -> Result<CueBox> {
    let mut boxes = decode_cue_boxes(data)?;
    if boxes.len() != 1 {
        return Err(VttError::InvalidData(format!(
            "expected one cue box, found {}",
            boxes.len()
        )));
    }
    Ok(boxes.remove(0))
}

/// Decodes a sequence of `vttc`/`vtte` boxes, such as a fragment payload.
pub fn decode_cue_boxes(data: &[u8]) -> Result<Vec<CueBox>> {
    let mut boxes = Vec::new();
    for raw in BoxIter::new(data) {
        let raw = raw?;
        match raw.tag {
            VTTC => boxes.push(CueBox::Cue(VttCueBox::parse_content(raw.content)?)),
            VTTE if raw.content.is_empty() => boxes.push(CueBox::Empty),
            VTTE => {
                return Err(VttError::InvalidData(format!(
                    "vtte box with {} content bytes",
                    raw.content.len()
                )))
            }
            other => {
                return Err(VttError::InvalidData(format!(
                    "unexpected {} box in cue sample",
                    other
                )))
            }
        }
    }
    Ok(boxes)
}

/// Encodes comment text as a `vtta` box.
pub fn encode_additional_text(text: &str) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(BOX_HEADER_SIZE + text.len());
    append_box(&mut buf, VTTA, text.as_bytes())?;
    Ok(buf.freeze())
}

pub(crate) fn box_text(tag: FourCC, content: &[u8]) -> Result<String> {
    String::from_utf8(content.to_vec())
        .map_err(|e| VttError::InvalidData(format!("{} box is not UTF-8: {}", tag, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_cue_box_layout() {
        let expected: &[u8] = &[
            0x00, 0x00, 0x00, 0x1c, // Size
            0x76, 0x74, 0x74, 0x63, // 'vttc'
            0x00, 0x00, 0x00, 0x14, // Size of payload box
            0x70, 0x61, 0x79, 0x6c, // 'payl'
            // "some message", no terminator
            0x73, 0x6f, 0x6d, 0x65, 0x20, 0x6d, 0x65, 0x73, 0x73, 0x61, 0x67, 0x65,
        ];
        let bytes = VttCueBox::new("some message").to_bytes().unwrap();
        assert_eq!(&bytes[..], expected);
        assert_eq!(VttCueBox::new("some message").size(), expected.len());
    }

    #[test]
    fn test_empty_cue_box() {
        let mut buf = BytesMut::new();
        VttEmptyCueBox.write_to(&mut buf).unwrap();
        assert_eq!(buf.len(), EMPTY_CUE_BOX_SIZE);
        assert_eq!(&buf[..], &VttEmptyCueBox.to_bytes()[..]);
        assert_eq!(&buf[4..], b"vtte");
        assert_eq!(decode_cue_box(&buf).unwrap(), CueBox::Empty);
    }

    #[test]
    fn test_child_order() {
        let cue = Cue::new(0, 1000, vec!["line one".into(), "line two".into()])
            .with_identifier("id-1")
            .with_settings("align:end");
        let bytes = encode_cue(&cue).unwrap();

        let outer: Vec<_> = BoxIter::new(&bytes).collect::<Result<_>>().unwrap();
        assert_eq!(outer.len(), 1);
        let tags: Vec<FourCC> = BoxIter::new(outer[0].content)
            .map(|b| b.unwrap().tag)
            .collect();
        assert_eq!(tags, vec![PAYL, IDEN, STTG]);
    }

    #[test]
    fn test_round_trip_cue() {
        let cue = Cue::new(1500, 250, vec!["<v Bob>hi".into(), "there".into()])
            .with_identifier("7")
            .with_settings("position:10%");
        let bytes = encode_cue(&cue).unwrap();

        match decode_cue_box(&bytes).unwrap() {
            CueBox::Cue(cue_box) => assert_eq!(cue_box.to_cue(1500, 250), cue),
            CueBox::Empty => panic!("expected vttc"),
        }
    }

    #[test]
    fn test_comment_has_no_cue_box() {
        let cue = Cue::comment(vec!["note".into()]);
        assert!(matches!(encode_cue(&cue), Err(VttError::InvalidData(_))));
    }

    #[test]
    fn test_decode_fragment_payload() {
        let mut buf = BytesMut::new();
        VttCueBox::new("hi").write_to(&mut buf).unwrap();
        VttCueBox::new("hello").write_to(&mut buf).unwrap();

        let boxes = decode_cue_boxes(&buf).unwrap();
        assert_eq!(
            boxes,
            vec![
                CueBox::Cue(VttCueBox::new("hi")),
                CueBox::Cue(VttCueBox::new("hello")),
            ]
        );
    }

    #[test]
    fn test_decode_malformed() {
        // Unknown top-level tag
        let mut buf = BytesMut::new();
        append_box(&mut buf, PAYL, b"x").unwrap();
        assert!(decode_cue_box(&buf).is_err());

        // vttc without payl
        let mut buf = BytesMut::new();
        append_box(&mut buf, VTTC, b"").unwrap();
        assert!(decode_cue_box(&buf).is_err());

        // Invalid UTF-8 payload
        let mut inner = BytesMut::new();
        append_box(&mut inner, PAYL, &[0xff, 0xfe]).unwrap();
        let mut buf = BytesMut::new();
        append_box(&mut buf, VTTC, &inner).unwrap();
        assert!(decode_cue_box(&buf).is_err());

        // Truncated
        let bytes = VttCueBox::new("hello").to_bytes().unwrap();
        assert!(decode_cue_box(&bytes[..bytes.len() - 1]).is_err());

        // vtte with content
        let mut buf = BytesMut::new();
        append_box(&mut buf, VTTE, b"x").unwrap();
        assert!(decode_cue_box(&buf).is_err());

        // Two boxes where one is expected
        let mut buf = BytesMut::new();
        VttEmptyCueBox.write_to(&mut buf).unwrap();
        VttEmptyCueBox.write_to(&mut buf).unwrap();
        assert!(decode_cue_box(&buf).is_err());
    }

    #[test]
    fn test_unknown_child_is_skipped() {
        let mut inner = BytesMut::new();
        append_box(&mut inner, PAYL, b"text").unwrap();
        append_box(&mut inner, FourCC::new(b"ctim"), b"00:00.000").unwrap();
        let mut buf = BytesMut::new();
        append_box(&mut buf, VTTC, &inner).unwrap();

        assert_eq!(
            decode_cue_box(&buf).unwrap(),
            CueBox::Cue(VttCueBox::new("text"))
        );
    }

    #[quickcheck]
    fn prop_payload_round_trip(text: String, id: String, settings: String) -> bool {
        let cue_box = VttCueBox {
            cue_text: text,
            cue_id: id,
            cue_settings: settings,
        };
        let bytes = match cue_box.to_bytes() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };
        bytes.len() == cue_box.size()
            && decode_cue_box(&bytes).ok() == Some(CueBox::Cue(cue_box))
    }
}

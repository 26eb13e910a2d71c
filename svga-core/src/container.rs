//! SVGA container format serialization and deserialization
//!
//! An SVGA 2.0 file is a protobuf `MovieEntity` message compressed as a
//! single zlib stream.

use crate::{
    AnimationDocument, AnimationParams, Error, Fps, FrameState, Layout, Result, Sprite,
    Transform2D, DOCUMENT_VERSION,
};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use prost::Message;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Protobuf messages of the SVGA 2.0 schema.
///
/// Only the fields this encoder populates are declared; unknown fields in
/// files written by other tools are skipped on decode.
pub mod proto {
    use std::collections::BTreeMap;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct MovieEntity {
        #[prost(string, tag = "1")]
        pub version: String,
        #[prost(message, optional, tag = "2")]
        pub params: Option<MovieParams>,
        #[prost(btree_map = "string, bytes", tag = "3")]
        pub images: BTreeMap<String, Vec<u8>>,
        #[prost(message, repeated, tag = "4")]
        pub sprites: Vec<SpriteEntity>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct MovieParams {
        #[prost(float, tag = "1")]
        pub view_box_width: f32,
        #[prost(float, tag = "2")]
        pub view_box_height: f32,
        #[prost(int32, tag = "3")]
        pub fps: i32,
        #[prost(int32, tag = "4")]
        pub frames: i32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct SpriteEntity {
        #[prost(string, tag = "1")]
        pub image_key: String,
        #[prost(message, repeated, tag = "2")]
        pub frames: Vec<FrameEntity>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct FrameEntity {
        #[prost(float, tag = "1")]
        pub alpha: f32,
        #[prost(message, optional, tag = "2")]
        pub layout: Option<Layout>,
        #[prost(message, optional, tag = "3")]
        pub transform: Option<Transform>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Layout {
        #[prost(float, tag = "1")]
        pub x: f32,
        #[prost(float, tag = "2")]
        pub y: f32,
        #[prost(float, tag = "3")]
        pub width: f32,
        #[prost(float, tag = "4")]
        pub height: f32,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Transform {
        #[prost(float, tag = "1")]
        pub a: f32,
        #[prost(float, tag = "2")]
        pub b: f32,
        #[prost(float, tag = "3")]
        pub c: f32,
        #[prost(float, tag = "4")]
        pub d: f32,
        #[prost(float, tag = "5")]
        pub tx: f32,
        #[prost(float, tag = "6")]
        pub ty: f32,
    }
}

impl From<&AnimationDocument> for proto::MovieEntity {
    fn from(doc: &AnimationDocument) -> Self {
        Self {
            version: doc.version.clone(),
            params: Some(proto::MovieParams {
                view_box_width: doc.params.view_box_width,
                view_box_height: doc.params.view_box_height,
                fps: doc.params.fps.get() as i32,
                frames: doc.params.frame_count as i32,
            }),
            images: doc.images.clone(),
            sprites: doc
                .sprites
                .iter()
                .map(|sprite| proto::SpriteEntity {
                    image_key: sprite.image_key.clone(),
                    frames: sprite.frames.iter().map(frame_to_proto).collect(),
                })
                .collect(),
        }
    }
}

fn frame_to_proto(state: &FrameState) -> proto::FrameEntity {
    let layout = state.layout;
    let t = state.transform;
    proto::FrameEntity {
        alpha: state.alpha,
        layout: Some(proto::Layout {
            x: layout.x,
            y: layout.y,
            width: layout.width,
            height: layout.height,
        }),
        transform: Some(proto::Transform {
            a: t.a,
            b: t.b,
            c: t.c,
            d: t.d,
            tx: t.tx,
            ty: t.ty,
        }),
    }
}

fn frame_from_proto(frame: proto::FrameEntity) -> FrameState {
    let layout = frame
        .layout
        .map(|l| Layout {
            x: l.x,
            y: l.y,
            width: l.width,
            height: l.height,
        })
        .unwrap_or_default();
    let transform = frame
        .transform
        .map(|t| Transform2D {
            a: t.a,
            b: t.b,
            c: t.c,
            d: t.d,
            tx: t.tx,
            ty: t.ty,
        })
        .unwrap_or_default();
    FrameState {
        alpha: frame.alpha,
        layout,
        transform,
    }
}

impl TryFrom<proto::MovieEntity> for AnimationDocument {
    type Error = Error;

    fn try_from(movie: proto::MovieEntity) -> Result<Self> {
        if movie.version != DOCUMENT_VERSION {
            return Err(Error::UnsupportedVersion(movie.version));
        }
        let params = movie.params.ok_or(Error::MissingParams)?;

        Ok(Self {
            version: movie.version,
            params: AnimationParams {
                view_box_width: params.view_box_width,
                view_box_height: params.view_box_height,
                fps: Fps::snap(params.fps as i64),
                frame_count: params.frames.max(0) as u32,
            },
            images: movie.images,
            sprites: movie
                .sprites
                .into_iter()
                .map(|s| Sprite::new(s.image_key, s.frames.into_iter().map(frame_from_proto).collect()))
                .collect(),
        })
    }
}

/// Validates, serializes and zlib-compresses a document
pub fn encode(doc: &AnimationDocument) -> Result<Vec<u8>> {
    doc.validate()?;

    let movie = proto::MovieEntity::from(doc);
    let raw = movie.encode_to_vec();

    let mut encoder = ZlibEncoder::new(Vec::with_capacity(raw.len() / 2), Compression::default());
    encoder.write_all(&raw)?;
    let compressed = encoder.finish()?;

    tracing::debug!(
        serialized = raw.len(),
        compressed = compressed.len(),
        "encoded movie entity"
    );
    Ok(compressed)
}

/// Decompresses and parses an SVGA 2.0 file
pub fn decode(data: &[u8]) -> Result<AnimationDocument> {
    let mut raw = Vec::new();
    ZlibDecoder::new(data).read_to_end(&mut raw)?;

    let movie = proto::MovieEntity::decode(raw.as_slice())?;
    AnimationDocument::try_from(movie)
}

/// Writes `data` to `path`, replacing any existing file.
///
/// The bytes go to a sibling temporary file first and are renamed into
/// place, so readers never observe a partially written file.
pub fn save(path: &Path, data: &[u8]) -> Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".partial");
    let tmp_path = path.with_file_name(tmp_name);

    fs::write(&tmp_path, data)?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), bytes = data.len(), "saved animation");
    Ok(())
}

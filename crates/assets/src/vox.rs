use std::io::Read;

use voxelwall_common::Color;

use crate::model::{Palette, VoxelDimensions, VoxelModel, VoxelModelFrame};
use crate::{AssetError, VoxelModelLoader};

/// File magic. The trailing space is part of it.
const MAGIC: &[u8; 4] = b"VOX ";

/// Number of palette entries stored in an `RGBA` chunk that map to colors.
/// File entry `i` is palette index `i + 1`.
const PALETTE_ENTRIES: usize = 255;

/// Largest model extent per axis. Voxel coordinates are single bytes.
const MAX_AXIS: i32 = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChunkId {
    Main,
    Size,
    VoxelData,
    Palette,
    Pack,
    Other([u8; 4]),
}

impl ChunkId {
    fn from_bytes(bytes: [u8; 4]) -> Self {
        match &bytes {
            b"MAIN" => ChunkId::Main,
            b"SIZE" => ChunkId::Size,
            b"XYZI" => ChunkId::VoxelData,
            b"RGBA" => ChunkId::Palette,
            b"PACK" => ChunkId::Pack,
            _ => ChunkId::Other(bytes),
        }
    }

    fn name(self) -> String {
        match self {
            ChunkId::Main => "MAIN".into(),
            ChunkId::Size => "SIZE".into(),
            ChunkId::VoxelData => "XYZI".into(),
            ChunkId::Palette => "RGBA".into(),
            ChunkId::Pack => "PACK".into(),
            ChunkId::Other(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Header of a chunk: its id, and where its content and children end.
#[derive(Debug, Clone, Copy)]
struct Chunk {
    id: ChunkId,
    end: usize,
}

/// Little-endian cursor over the whole file.
struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], AssetError> {
        let bytes = self
            .data
            .get(self.pos..self.pos + N)
            .ok_or(AssetError::Truncated { offset: self.pos })?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, AssetError> {
        Ok(self.take::<1>()?[0])
    }

    fn i32(&mut self) -> Result<i32, AssetError> {
        Ok(i32::from_le_bytes(self.take::<4>()?))
    }

    fn skip_to(&mut self, end: usize) -> Result<(), AssetError> {
        if end > self.data.len() {
            return Err(AssetError::Truncated {
                offset: self.data.len(),
            });
        }
        self.pos = self.pos.max(end);
        Ok(())
    }

    /// Read a chunk header: id, content size, children size.
    fn chunk(&mut self) -> Result<Chunk, AssetError> {
        let id = ChunkId::from_bytes(self.take::<4>()?);
        let content = self.i32()?.max(0) as usize;
        let children = self.i32()?.max(0) as usize;
        Ok(Chunk {
            id,
            end: self.pos + content + children,
        })
    }

    fn expect_chunk(&mut self, id: ChunkId, expected: &'static str) -> Result<Chunk, AssetError> {
        let chunk = self.chunk()?;
        if chunk.id != id {
            return Err(AssetError::UnexpectedChunk {
                expected,
                found: chunk.id.name(),
            });
        }
        Ok(chunk)
    }
}

/// Loader for the MagicaVoxel `.vox` format.
///
/// MagicaVoxel is z-up; frames are converted to the y-up layout on load.
#[derive(Debug, Clone, Copy, Default)]
pub struct MagicaVoxelLoader;

impl VoxelModelLoader for MagicaVoxelLoader {
    fn load(&self, reader: &mut dyn Read) -> Result<VoxelModel, AssetError> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        self.parse(&data)
    }
}

impl MagicaVoxelLoader {
    /// Parse a complete `.vox` file held in memory.
    pub fn parse(&self, data: &[u8]) -> Result<VoxelModel, AssetError> {
        let mut input = Cursor::new(data);

        let magic = input.take::<4>()?;
        if &magic != MAGIC {
            return Err(AssetError::BadMagic(
                String::from_utf8_lossy(&magic).into_owned(),
            ));
        }
        let _version = input.i32()?;

        // MAIN's content is empty, everything else is its children.
        input.expect_chunk(ChunkId::Main, "MAIN")?;

        let mut frame_count = 1usize;
        let mut next = input.chunk()?;
        if next.id == ChunkId::Pack {
            frame_count = input.i32()?.max(0) as usize;
            input.skip_to(next.end)?;
            next = input.chunk()?;
        }
        tracing::debug!(frame_count, "expecting sub models");

        let mut model = VoxelModel::default();
        let mut pending = Some(next);
        for frame in 0..frame_count {
            let size = match pending.take() {
                Some(chunk) => chunk,
                None => input.chunk()?,
            };
            model.frames.push(read_frame(&mut input, size, frame)?);
        }

        // Remaining chunks: an optional palette plus scene-graph, material and
        // layer chunks this loader does not use.
        loop {
            let chunk = match pending.take() {
                Some(chunk) => chunk,
                None if input.is_at_end() => break,
                None => input.chunk()?,
            };
            match chunk.id {
                ChunkId::Palette => read_palette(&mut input, chunk, &mut model.palette)?,
                other => tracing::trace!(chunk = %other.name(), "skipping chunk"),
            }
            input.skip_to(chunk.end)?;
        }

        Ok(model)
    }
}

/// Read a `SIZE` chunk (already opened as `size`) and the `XYZI` chunk after it.
fn read_frame(
    input: &mut Cursor<'_>,
    size: Chunk,
    frame: usize,
) -> Result<VoxelModelFrame, AssetError> {
    if size.id != ChunkId::Size {
        return Err(AssetError::UnexpectedChunk {
            expected: "SIZE",
            found: size.id.name(),
        });
    }

    // MagicaVoxel stores x, y, z with z being the height.
    let width = input.i32()?;
    let depth = input.i32()?;
    let height = input.i32()?;
    let in_range = |v: i32| (1..=MAX_AXIS).contains(&v);
    if !(in_range(width) && in_range(height) && in_range(depth)) {
        return Err(AssetError::InvalidDimensions {
            width,
            height,
            depth,
        });
    }
    input.skip_to(size.end)?;

    let dimensions = VoxelDimensions::new(width as usize, height as usize, depth as usize);
    let mut model_frame = VoxelModelFrame::new(dimensions);

    let voxels = input.expect_chunk(ChunkId::VoxelData, "XYZI")?;
    let count = input.i32()?.max(0) as usize;
    if count == 0 {
        return Err(AssetError::EmptyFrame { frame });
    }
    for _ in 0..count {
        let x = input.u8()? as usize;
        let y = input.u8()? as usize;
        let z = input.u8()? as usize;
        let color_index = input.u8()?;
        // Swap y and z into the y-up layout.
        model_frame.set_color_index_at(x, z, y, color_index)?;
    }
    input.skip_to(voxels.end)?;

    Ok(model_frame)
}

/// Read up to 255 entries, never past the end of the `RGBA` chunk.
fn read_palette(
    input: &mut Cursor<'_>,
    chunk: Chunk,
    palette: &mut Palette,
) -> Result<(), AssetError> {
    let available = chunk.end.saturating_sub(input.pos) / 4;
    for i in 0..PALETTE_ENTRIES.min(available) {
        let [r, g, b, a] = input.take::<4>()?;
        palette.set_color((i + 1) as u8, Color::from_rgba8(r, g, b, a));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Builds `.vox` files chunk by chunk.
    pub(crate) struct VoxWriter {
        children: Vec<u8>,
    }

    impl VoxWriter {
        pub(crate) fn new() -> Self {
            Self {
                children: Vec::new(),
            }
        }

        pub(crate) fn chunk(mut self, id: &[u8; 4], content: &[u8]) -> Self {
            self.children.extend_from_slice(id);
            self.children
                .extend_from_slice(&(content.len() as i32).to_le_bytes());
            self.children.extend_from_slice(&0i32.to_le_bytes());
            self.children.extend_from_slice(content);
            self
        }

        pub(crate) fn pack(self, frames: i32) -> Self {
            self.chunk(b"PACK", &frames.to_le_bytes())
        }

        /// A SIZE + XYZI pair. `voxels` are `(x, y, z, color)` in z-up space.
        pub(crate) fn frame(self, size: [i32; 3], voxels: &[[u8; 4]]) -> Self {
            let mut size_content = Vec::new();
            for v in size {
                size_content.extend_from_slice(&v.to_le_bytes());
            }
            let mut xyzi = (voxels.len() as i32).to_le_bytes().to_vec();
            for v in voxels {
                xyzi.extend_from_slice(v);
            }
            self.chunk(b"SIZE", &size_content).chunk(b"XYZI", &xyzi)
        }

        pub(crate) fn palette(self, first: [u8; 4]) -> Self {
            let mut content = vec![255u8; 256 * 4];
            content[..4].copy_from_slice(&first);
            self.chunk(b"RGBA", &content)
        }

        pub(crate) fn finish(self) -> Vec<u8> {
            let mut out = MAGIC.to_vec();
            out.extend_from_slice(&150i32.to_le_bytes());
            out.extend_from_slice(b"MAIN");
            out.extend_from_slice(&0i32.to_le_bytes());
            out.extend_from_slice(&(self.children.len() as i32).to_le_bytes());
            out.extend_from_slice(&self.children);
            out
        }
    }

    fn parse(data: &[u8]) -> Result<VoxelModel, AssetError> {
        MagicaVoxelLoader.parse(data)
    }

    #[test]
    fn single_frame_without_pack_or_palette() {
        let data = VoxWriter::new()
            .frame([2, 3, 4], &[[1, 2, 3, 9]])
            .finish();
        let model = parse(&data).unwrap();

        assert_eq!(model.frames.len(), 1);
        let frame = &model.frames[0];
        // x=2, y(depth)=3, z(height)=4
        assert_eq!(frame.dimensions(), VoxelDimensions::new(2, 4, 3));
        // MagicaVoxel (1, 2, 3) is (1, 3, 2) in y-up space.
        assert_eq!(frame.color_index_at(1, 3, 2), Some(9));
        assert_eq!(frame.voxel_count(), 1);
        assert_eq!(model.palette, Palette::default());
    }

    #[test]
    fn pack_with_multiple_frames() {
        let data = VoxWriter::new()
            .pack(2)
            .frame([1, 1, 1], &[[0, 0, 0, 1]])
            .frame([2, 2, 2], &[[1, 1, 1, 2], [0, 0, 0, 3]])
            .finish();
        let model = parse(&data).unwrap();

        assert_eq!(model.frames.len(), 2);
        assert_eq!(model.frames[1].voxel_count(), 2);
    }

    #[test]
    fn palette_entries_start_at_index_one() {
        let data = VoxWriter::new()
            .frame([1, 1, 1], &[[0, 0, 0, 1]])
            .palette([255, 0, 0, 255])
            .finish();
        let model = parse(&data).unwrap();

        assert_eq!(model.palette.color_at(1), Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(model.palette.color_at(2), Some(Color::WHITE));
        assert_eq!(model.palette.color_at(0), None);
    }

    #[test]
    fn unknown_trailing_chunks_are_skipped() {
        let data = VoxWriter::new()
            .frame([1, 1, 1], &[[0, 0, 0, 1]])
            .chunk(b"nTRN", &[1, 2, 3, 4, 5])
            .palette([0, 255, 0, 255])
            .chunk(b"MATL", &[0; 12])
            .finish();
        let model = parse(&data).unwrap();

        assert_eq!(model.palette.color_at(1), Some(Color::GREEN));
    }

    #[test]
    fn bad_magic() {
        let mut data = VoxWriter::new().frame([1, 1, 1], &[[0, 0, 0, 1]]).finish();
        data[..4].copy_from_slice(b"GLTF");
        assert!(matches!(parse(&data), Err(AssetError::BadMagic(m)) if m == "GLTF"));
    }

    #[test]
    fn missing_main_chunk() {
        let mut data = MAGIC.to_vec();
        data.extend_from_slice(&150i32.to_le_bytes());
        data.extend_from_slice(b"SIZE");
        data.extend_from_slice(&[0; 8]);
        assert!(matches!(
            parse(&data),
            Err(AssetError::UnexpectedChunk { expected: "MAIN", .. })
        ));
    }

    #[test]
    fn empty_frame_is_rejected() {
        let data = VoxWriter::new().frame([1, 1, 1], &[]).finish();
        assert!(matches!(parse(&data), Err(AssetError::EmptyFrame { frame: 0 })));
    }

    #[test]
    fn voxel_outside_bounds_is_rejected() {
        let data = VoxWriter::new()
            .frame([1, 1, 1], &[[0, 0, 5, 1]])
            .finish();
        assert!(matches!(
            parse(&data),
            Err(AssetError::VoxelOutOfBounds { .. })
        ));
    }

    #[test]
    fn invalid_dimensions() {
        let data = VoxWriter::new().frame([0, 1, 1], &[[0, 0, 0, 1]]).finish();
        assert!(matches!(
            parse(&data),
            Err(AssetError::InvalidDimensions { width: 0, .. })
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected_before_allocating() {
        let data = VoxWriter::new()
            .frame([65536, 65536, 65536], &[[0, 0, 0, 1]])
            .finish();
        assert!(matches!(
            parse(&data),
            Err(AssetError::InvalidDimensions { width: 65536, .. })
        ));

        let data = VoxWriter::new().frame([256, 1, 257], &[[0, 0, 0, 1]]).finish();
        assert!(matches!(
            parse(&data),
            Err(AssetError::InvalidDimensions { height: 257, .. })
        ));
    }

    #[test]
    fn largest_extent_is_accepted() {
        let data = VoxWriter::new()
            .frame([256, 1, 1], &[[255, 0, 0, 1]])
            .finish();
        let model = parse(&data).unwrap();
        assert_eq!(model.frames[0].color_index_at(255, 0, 0), Some(1));
    }

    #[test]
    fn short_palette_stops_at_chunk_end() {
        let mut content = Vec::new();
        content.extend_from_slice(&[255, 0, 0, 255]);
        content.extend_from_slice(&[0, 255, 0, 255]);
        let data = VoxWriter::new()
            .frame([1, 1, 1], &[[0, 0, 0, 1]])
            .chunk(b"RGBA", &content)
            .chunk(b"MATL", &[7; 16])
            .finish();
        let model = parse(&data).unwrap();

        assert_eq!(model.palette.color_at(1), Some(Color::new(1.0, 0.0, 0.0, 1.0)));
        assert_eq!(model.palette.color_at(2), Some(Color::GREEN));
        assert_eq!(model.palette.color_at(3), Some(Color::WHITE));
    }

    #[test]
    fn truncated_voxel_data() {
        let mut data = VoxWriter::new()
            .frame([2, 2, 2], &[[0, 0, 0, 1], [1, 1, 1, 1]])
            .finish();
        data.truncate(data.len() - 2);
        assert!(matches!(parse(&data), Err(AssetError::Truncated { .. })));
    }

    #[test]
    fn load_through_reader() {
        let data = VoxWriter::new().frame([1, 1, 1], &[[0, 0, 0, 4]]).finish();
        let model = MagicaVoxelLoader.load(&mut data.as_slice()).unwrap();
        assert_eq!(model.frames[0].color_index_at(0, 0, 0), Some(4));
    }
}

//! MRC header structure
//!
//! Parses the fixed 1024-byte MRC2014 header in either byte order and
//! serialises new headers in little-endian order.

use std::fmt;
use std::io::{Cursor, Seek, SeekFrom, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use log::{debug, warn};
use ndarray::ArrayViewD;

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::mrc::constants::{self, header, machine_stamp, modes, space_group};
use crate::mrc::errors::{MrcError, MrcResult};
use crate::utils::string_utils;

/// Decoded MRC header
#[derive(Debug, Clone, PartialEq)]
pub struct MrcHeader {
    /// Columns, rows and sections
    pub nx: i32,
    pub ny: i32,
    pub nz: i32,
    /// Sample mode
    pub mode: i32,
    /// Index of the first column, row and section
    pub start: [i32; 3],
    /// Sampling along X, Y and Z
    pub sampling: [i32; 3],
    /// Cell dimensions in angstroms
    pub cell_lengths: [f32; 3],
    /// Cell angles in degrees
    pub cell_angles: [f32; 3],
    /// Axis correspondence (1=X, 2=Y, 3=Z)
    pub axis_map: [i32; 3],
    pub dmin: f32,
    pub dmax: f32,
    pub dmean: f32,
    /// Space group
    pub ispg: i32,
    /// Size of the extended header in bytes
    pub nsymbt: i32,
    /// Extended header type code
    pub exttyp: [u8; 4],
    pub nversion: i32,
    pub origin: [f32; 3],
    /// Standard deviation of the samples
    pub rms: f32,
    /// Text labels
    pub labels: Vec<String>,
}

impl MrcHeader {
    /// Parse a raw header block
    ///
    /// # Arguments
    /// * `raw` - At least 1024 bytes read from the start of the file
    ///
    /// # Returns
    /// The header and the byte order used for the data block
    pub fn parse(raw: &[u8]) -> MrcResult<(Self, ByteOrder)> {
        if raw.len() < header::SIZE {
            return Err(MrcError::TruncatedHeader(raw.len()));
        }

        let byte_order = ByteOrder::detect(raw);
        let handler = byte_order.create_handler();
        let mut cursor = Cursor::new(&raw[..header::SIZE]);

        let handler = handler.as_ref();
        let [nx, ny, nz] = Self::read_i32_triplet(handler, &mut cursor, header::NX)?;
        let mode = Self::read_i32_at(handler, &mut cursor, header::MODE)?;
        let start = Self::read_i32_triplet(handler, &mut cursor, header::NXSTART)?;
        let sampling = Self::read_i32_triplet(handler, &mut cursor, header::MX)?;
        let cell_lengths = Self::read_f32_triplet(handler, &mut cursor, header::CELLA)?;
        let cell_angles = Self::read_f32_triplet(handler, &mut cursor, header::CELLB)?;
        let axis_map = Self::read_i32_triplet(handler, &mut cursor, header::MAPC)?;
        let [dmin, dmax, dmean] = Self::read_f32_triplet(handler, &mut cursor, header::DMIN)?;
        let ispg = Self::read_i32_at(handler, &mut cursor, header::ISPG)?;
        let nsymbt = Self::read_i32_at(handler, &mut cursor, header::NSYMBT)?;

        let mut exttyp = [0u8; 4];
        exttyp.copy_from_slice(&raw[header::EXTTYP..header::EXTTYP + 4]);

        let nversion = Self::read_i32_at(handler, &mut cursor, header::NVERSION)?;
        let origin = Self::read_f32_triplet(handler, &mut cursor, header::ORIGIN)?;

        if &raw[header::MAP..header::MAP + 4] != header::MAP_ID {
            // Pre-2000 files leave this field blank.
            warn!("MAP identifier missing from header");
        }

        let rms = Self::read_f32_at(handler, &mut cursor, header::RMS)?;
        let nlabl = Self::read_i32_at(handler, &mut cursor, header::NLABL)?;

        let label_count = nlabl.clamp(0, header::LABEL_COUNT as i32) as usize;
        let labels = (0..label_count)
            .map(|i| {
                let offset = header::LABELS + i * header::LABEL_SIZE;
                string_utils::label_from_bytes(&raw[offset..offset + header::LABEL_SIZE])
            })
            .collect();

        let parsed = MrcHeader {
            nx, ny, nz, mode, start, sampling, cell_lengths, cell_angles, axis_map,
            dmin, dmax, dmean, ispg, nsymbt, exttyp, nversion, origin, rms, labels,
        };
        parsed.validate()?;

        debug!("Parsed MRC header: {}x{}x{} mode {} ({})", nx, ny, nz, mode, byte_order.name());
        Ok((parsed, byte_order))
    }

    fn read_i32_at(handler: &dyn ByteOrderHandler, cursor: &mut Cursor<&[u8]>, offset: usize) -> MrcResult<i32> {
        cursor.seek(SeekFrom::Start(offset as u64))?;
        Ok(handler.read_i32(cursor)?)
    }

    fn read_f32_at(handler: &dyn ByteOrderHandler, cursor: &mut Cursor<&[u8]>, offset: usize) -> MrcResult<f32> {
        cursor.seek(SeekFrom::Start(offset as u64))?;
        Ok(handler.read_f32(cursor)?)
    }

    /// Three consecutive words starting at `offset`
    fn read_i32_triplet(handler: &dyn ByteOrderHandler, cursor: &mut Cursor<&[u8]>, offset: usize) -> MrcResult<[i32; 3]> {
        cursor.seek(SeekFrom::Start(offset as u64))?;
        Ok([handler.read_i32(cursor)?, handler.read_i32(cursor)?, handler.read_i32(cursor)?])
    }

    fn read_f32_triplet(handler: &dyn ByteOrderHandler, cursor: &mut Cursor<&[u8]>, offset: usize) -> MrcResult<[f32; 3]> {
        cursor.seek(SeekFrom::Start(offset as u64))?;
        Ok([handler.read_f32(cursor)?, handler.read_f32(cursor)?, handler.read_f32(cursor)?])
    }

    fn validate(&self) -> MrcResult<()> {
        if self.nx <= 0 || self.ny <= 0 || self.nz <= 0 {
            return Err(MrcError::InvalidHeader(format!(
                "non-positive dimensions {}x{}x{}", self.nx, self.ny, self.nz
            )));
        }
        if self.nsymbt < 0 {
            return Err(MrcError::InvalidHeader(format!(
                "negative extended header size {}", self.nsymbt
            )));
        }
        let sample_size = constants::bytes_per_sample(self.mode)
            .ok_or(MrcError::UnsupportedMode(self.mode, constants::mode_name(self.mode)))?;
        self.data_size(sample_size)?;
        Ok(())
    }

    /// Build a float32 header for an array shaped like the reader produces
    ///
    /// `shape` is `(ny, nx)` or `(nz, ny, nx)`; `voxel_size` is carried over
    /// from the source so patches keep their pixel spacing.
    pub fn for_data(shape: &[usize], voxel_size: [f32; 3]) -> MrcResult<Self> {
        let (nz, ny, nx) = match *shape {
            [ny, nx] => (1, ny, nx),
            [nz, ny, nx] => (nz, ny, nx),
            _ => return Err(MrcError::UnsupportedShape(shape.to_vec())),
        };

        let to_i32 = |v: usize| i32::try_from(v)
            .map_err(|_| MrcError::UnsupportedShape(shape.to_vec()));
        let (nx, ny, nz) = (to_i32(nx)?, to_i32(ny)?, to_i32(nz)?);

        Ok(MrcHeader {
            nx,
            ny,
            nz,
            mode: modes::FLOAT32,
            start: [0, 0, 0],
            sampling: [nx, ny, nz],
            cell_lengths: [
                voxel_size[0] * nx as f32,
                voxel_size[1] * ny as f32,
                voxel_size[2] * nz as f32,
            ],
            cell_angles: [90.0, 90.0, 90.0],
            axis_map: [1, 2, 3],
            dmin: 0.0,
            dmax: -1.0,
            dmean: -2.0,
            ispg: if nz == 1 { space_group::IMAGE } else { space_group::VOLUME },
            nsymbt: 0,
            exttyp: [0u8; 4],
            nversion: header::NVERSION_2014,
            origin: [0.0, 0.0, 0.0],
            rms: -1.0,
            labels: vec![format!("Created by patchkit {}", env!("CARGO_PKG_VERSION"))],
        })
    }

    /// Recompute min, max, mean and rms from the samples
    pub fn update_stats(&mut self, data: &ArrayViewD<'_, f32>) {
        if data.is_empty() {
            return;
        }

        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        let mut sum = 0.0f64;
        for &v in data.iter() {
            min = min.min(v);
            max = max.max(v);
            sum += v as f64;
        }
        let count = data.len() as f64;
        let mean = sum / count;
        let variance = data.iter()
            .map(|&v| {
                let d = v as f64 - mean;
                d * d
            })
            .sum::<f64>() / count;

        self.dmin = min;
        self.dmax = max;
        self.dmean = mean as f32;
        self.rms = variance.sqrt() as f32;
    }

    /// Voxel size in angstroms derived from cell lengths and sampling
    pub fn voxel_size(&self) -> [f32; 3] {
        let per_axis = |length: f32, sampling: i32| {
            if sampling > 0 { length / sampling as f32 } else { 0.0 }
        };
        [
            per_axis(self.cell_lengths[0], self.sampling[0]),
            per_axis(self.cell_lengths[1], self.sampling[1]),
            per_axis(self.cell_lengths[2], self.sampling[2]),
        ]
    }

    /// Array shape of the data block: `(ny, nx)` for one section, `(nz, ny, nx)` otherwise
    pub fn data_shape(&self) -> Vec<usize> {
        if self.nz == 1 {
            vec![self.ny as usize, self.nx as usize]
        } else {
            vec![self.nz as usize, self.ny as usize, self.nx as usize]
        }
    }

    /// Number of samples in the data block
    ///
    /// Fails when the dimensions multiply beyond the address space.
    pub fn sample_count(&self) -> MrcResult<usize> {
        [self.ny, self.nz]
            .iter()
            .try_fold(self.nx as usize, |acc, &n| acc.checked_mul(n as usize))
            .ok_or_else(|| MrcError::InvalidHeader(format!(
                "dimensions {}x{}x{} are too large", self.nx, self.ny, self.nz
            )))
    }

    /// Size in bytes of a data block of `sample_size`-byte samples
    pub fn data_size(&self, sample_size: usize) -> MrcResult<usize> {
        self.sample_count()?
            .checked_mul(sample_size)
            .ok_or_else(|| MrcError::InvalidHeader(format!(
                "data block of {}x{}x{} samples is too large", self.nx, self.ny, self.nz
            )))
    }

    /// Serialise as a little-endian 1024-byte header
    pub fn to_bytes(&self) -> MrcResult<Vec<u8>> {
        let mut buffer = Vec::with_capacity(header::SIZE);

        for value in [self.nx, self.ny, self.nz, self.mode] {
            buffer.write_i32::<LittleEndian>(value)?;
        }
        for value in self.start.iter().chain(&self.sampling) {
            buffer.write_i32::<LittleEndian>(*value)?;
        }
        for value in self.cell_lengths.iter().chain(&self.cell_angles) {
            buffer.write_f32::<LittleEndian>(*value)?;
        }
        for value in self.axis_map {
            buffer.write_i32::<LittleEndian>(value)?;
        }
        for value in [self.dmin, self.dmax, self.dmean] {
            buffer.write_f32::<LittleEndian>(value)?;
        }
        buffer.write_i32::<LittleEndian>(self.ispg)?;
        buffer.write_i32::<LittleEndian>(self.nsymbt)?;

        buffer.resize(header::EXTTYP, 0);
        buffer.write_all(&self.exttyp)?;
        buffer.write_i32::<LittleEndian>(self.nversion)?;

        buffer.resize(header::ORIGIN, 0);
        for value in self.origin {
            buffer.write_f32::<LittleEndian>(value)?;
        }
        buffer.write_all(header::MAP_ID)?;
        buffer.write_all(&machine_stamp::LITTLE_ENDIAN)?;
        buffer.write_all(&[0, 0])?;
        buffer.write_f32::<LittleEndian>(self.rms)?;

        let labels = &self.labels[..self.labels.len().min(header::LABEL_COUNT)];
        buffer.write_i32::<LittleEndian>(labels.len() as i32)?;
        for label in labels {
            buffer.write_all(&string_utils::label_to_bytes(label, header::LABEL_SIZE))?;
        }

        buffer.resize(header::SIZE, 0);
        Ok(buffer)
    }
}

impl fmt::Display for MrcHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let voxel = self.voxel_size();
        writeln!(f, "MRC Header:")?;
        writeln!(f, "  Dimensions (nx, ny, nz): {} x {} x {}", self.nx, self.ny, self.nz)?;
        writeln!(f, "  Mode: {} ({})", self.mode, constants::mode_name(self.mode))?;
        writeln!(f, "  Voxel size: {:.3} x {:.3} x {:.3} A", voxel[0], voxel[1], voxel[2])?;
        writeln!(f, "  Min / max / mean: {} / {} / {}", self.dmin, self.dmax, self.dmean)?;
        writeln!(f, "  RMS: {}", self.rms)?;
        writeln!(f, "  Space group: {}", self.ispg)?;
        writeln!(f, "  Extended header: {} bytes", self.nsymbt)?;
        for label in &self.labels {
            writeln!(f, "  Label: {}", label)?;
        }
        Ok(())
    }
}

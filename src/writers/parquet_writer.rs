use crate::error::{Result, SoilError};
use crate::models::{Dataset, Raster};
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE,
};
use arrow::array::{Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Writes soil datasets as long-format Parquet: one row per (variable, layer, y, x) cell
pub struct ParquetWriter {
    compression: Compression,
    row_group_size: usize,
}

impl ParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: DEFAULT_ROW_GROUP_SIZE,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(SoilError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Write every variable of `dataset`, one record batch per variable; returns rows written
    pub fn write_dataset(&self, dataset: &Dataset, path: &Path) -> Result<usize> {
        if dataset.is_empty() {
            return Ok(0);
        }

        let schema = Self::create_schema();
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build();

        let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
        let mut rows = 0;

        for (name, raster) in dataset.iter() {
            let batch = Self::raster_to_batch(name, raster, schema.clone())?;
            rows += batch.num_rows();
            writer.write(&batch)?;
        }

        writer.close()?;
        info!(path = %path.display(), rows, variables = dataset.len(), "wrote soil dataset");
        Ok(rows)
    }

    fn create_schema() -> Arc<Schema> {
        let fields = vec![
            Field::new("variable", DataType::Utf8, false),
            Field::new("layer", DataType::UInt32, false),
            Field::new("y", DataType::Float64, false),
            Field::new("x", DataType::Float64, false),
            Field::new("value", DataType::Float64, true),
        ];

        Arc::new(Schema::new(fields))
    }

    /// Flatten a raster in (layer, y, x) order; NaN cells become nulls
    fn raster_to_batch(name: &str, raster: &Raster, schema: Arc<Schema>) -> Result<RecordBatch> {
        let (ny, nx, nl) = raster.shape();
        let capacity = ny * nx * nl;

        let mut layers = Vec::with_capacity(capacity);
        let mut ys = Vec::with_capacity(capacity);
        let mut xs = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);

        let data = raster.data();
        for (l, &layer) in raster.layers().iter().enumerate() {
            for (iy, &y) in raster.y().iter().enumerate() {
                for (ix, &x) in raster.x().iter().enumerate() {
                    let value = data[[iy, ix, l]];
                    layers.push(layer);
                    ys.push(y);
                    xs.push(x);
                    values.push((!value.is_nan()).then_some(value));
                }
            }
        }

        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![name; capacity])),
                Arc::new(UInt32Array::from(layers)),
                Arc::new(Float64Array::from(ys)),
                Arc::new(Float64Array::from(xs)),
                Arc::new(Float64Array::from(values)),
            ],
        )?;

        Ok(batch)
    }

    /// Get file statistics
    pub fn get_file_info(&self, path: &Path) -> Result<ParquetFileInfo> {
        use parquet::file::reader::{FileReader, SerializedFileReader};

        let file = File::open(path)?;
        let reader = SerializedFileReader::new(file)?;
        let metadata = reader.metadata();

        let total_rows = metadata.file_metadata().num_rows();
        let row_groups = metadata.num_row_groups();
        let file_size = std::fs::metadata(path)?.len();
        let compression = if row_groups > 0 && metadata.row_group(0).num_columns() > 0 {
            metadata.row_group(0).column(0).compression()
        } else {
            Compression::UNCOMPRESSED
        };

        Ok(ParquetFileInfo {
            total_rows,
            row_groups: row_groups as i32,
            row_group_sizes: (0..row_groups)
                .map(|i| metadata.row_group(i).num_rows())
                .collect(),
            file_size,
            compression,
        })
    }
}

impl Default for ParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug)]
pub struct ParquetFileInfo {
    pub total_rows: i64,
    pub row_groups: i32,
    pub row_group_sizes: Vec<i64>,
    pub file_size: u64,
    pub compression: Compression,
}

impl ParquetFileInfo {
    pub fn summary(&self) -> String {
        format!(
            "Parquet File Summary:\n\
            - Total rows: {}\n\
            - Row groups: {}\n\
            - File size: {:.2} MB\n\
            - Compression: {:?}\n\
            - Avg rows per group: {:.0}",
            self.total_rows,
            self.row_groups,
            self.file_size as f64 / 1_048_576.0,
            self.compression,
            self.total_rows as f64 / self.row_groups.max(1) as f64
        )
    }
}

use crate::array::ScalarType;
use crate::error::*;
use crate::image::ImageData;
use crate::transform::Direction;
use crate::util::*;
use clap::Parser;
use std::path::PathBuf;

/// Build a regular grid, fill it with a radial test field and locate a point
/// in it.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Grid extent: xmin,xmax,ymin,ymax,zmin,zmax.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        num_args = 6,
        allow_hyphen_values = true,
        default_values_t = [0, 31, 0, 31, 0, 31]
    )]
    pub extent: Vec<i32>,

    /// Sample spacing: sx,sy,sz.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        num_args = 3,
        allow_hyphen_values = true,
        default_values_t = [1.0, 1.0, 1.0]
    )]
    pub spacing: Vec<f64>,

    /// Physical location of index (0, 0, 0): ox,oy,oz.
    #[arg(
        short,
        long,
        value_delimiter = ',',
        num_args = 3,
        allow_hyphen_values = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    pub origin: Vec<f64>,

    /// Row-major direction matrix, nine values.
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 9,
        allow_hyphen_values = true
    )]
    pub direction: Option<Vec<f64>>,

    /// Scalar components per point.
    #[arg(long, default_value = "1")]
    pub components: usize,

    /// Crop the grid to this extent after filling it.
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 6,
        allow_hyphen_values = true
    )]
    pub crop: Option<Vec<i32>>,

    /// Physical point to locate: x,y,z.
    #[arg(
        long,
        value_delimiter = ',',
        num_args = 3,
        allow_hyphen_values = true
    )]
    pub locate: Option<Vec<f64>>,

    /// Squared distance tolerance for locating points outside the grid.
    #[arg(long, default_value = "0.0")]
    pub tolerance2: f64,

    /// Write the grid as a vtu file.
    #[arg(long)]
    pub vtk: Option<PathBuf>,

    /// Write a z slice of the first component as a png.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// Z index of the png slice, defaults to the middle of the grid.
    #[arg(long)]
    pub slice: Option<i32>,

    /// Chunk size to use for parallelism.
    #[arg(long, default_value = "1000")]
    pub chunk_size: usize,

    /// The number of threads to use.
    #[arg(short, long, default_value = "8")]
    pub threads: usize,
}

impl Args {
    /// Parse the command line and set up logging and the thread pool.
    pub fn cli_parse(name: &str) -> Self {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| {
                        tracing_subscriber::EnvFilter::new("info")
                    }),
            )
            .init();
        tracing::info!("EXAMPLE: {}", name);
        tracing::info!("VERSION: {}", env!("CARGO_PKG_VERSION"));
        let args = Args::parse();

        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .thread_name(|i| format!("rayon_thread_{}", i))
            .build_global()
        {
            tracing::warn!("Using existing thread pool: {}", e);
        }

        args
    }

    pub fn extent(&self) -> Extent {
        extent_from_slice(&self.extent)
    }

    pub fn crop_extent(&self) -> Option<Extent> {
        self.crop.as_deref().map(extent_from_slice)
    }

    pub fn locate_point(&self) -> Option<Point3> {
        self.locate.as_deref().map(Point3::from_column_slice)
    }

    /// Grid with the requested geometry and allocated `F64` scalars.
    pub fn grid(&self) -> Result<ImageData> {
        let mut image = ImageData::with_extent(self.extent())?;
        image.set_spacing(Point3::from_column_slice(&self.spacing));
        image.set_origin(Point3::from_column_slice(&self.origin));
        if let Some(direction) = &self.direction {
            let mut elements = [0.0; 9];
            elements.copy_from_slice(direction);
            image.set_direction(Direction::from_row_slice(&elements));
        }
        image.allocate_scalars(ScalarType::F64, self.components)?;
        Ok(image)
    }

    pub fn slice_index(&self, image: &ImageData) -> i32 {
        self.slice.unwrap_or_else(|| {
            let e = image.extent();
            (e.bounds[(2, 0)] + e.bounds[(2, 1)]) / 2
        })
    }
}

fn extent_from_slice(values: &[i32]) -> Extent {
    let mut e = [0; 6];
    e.copy_from_slice(values);
    Extent::from_array(e)
}

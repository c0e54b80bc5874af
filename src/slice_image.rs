use crate::error::*;
use crate::image::ImageData;
use crate::util::*;

/// One component of the active scalars on the z slice `k`,
/// normalized to `[0, 1]`, x fastest.
pub fn normalized_slice(
    image: &ImageData,
    k: i32,
    component: usize,
) -> Result<Vec<f64>> {
    let extent = image.extent();
    let slice = Extent::from_mm(
        vector![extent.bounds[(0, 0)], extent.bounds[(1, 0)], k],
        vector![extent.bounds[(0, 1)], extent.bounds[(1, 1)], k],
    );
    if slice.is_empty() || !extent.contains_extent(&slice) {
        return Err(GridError::CoordinateOutOfExtent {
            coord: slice.min(),
            extent: *extent,
        });
    }

    let mut values = Vec::with_capacity(slice.number_of_points());
    for coord in slice.coord_iter() {
        values.push(image.scalar_component(&coord, component)?);
    }

    let (min, max) = values
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let range = max - min;
    for v in values.iter_mut() {
        *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
    }
    Ok(values)
}

/// Write the z slice `k` of the active scalars as a png.
pub fn write_slice_png<F: AsRef<std::path::Path>>(
    image: &ImageData,
    k: i32,
    component: usize,
    s: &F,
) -> Result<()> {
    tracing::info!("Writing png: {:?}", s.as_ref());
    let values = normalized_slice(image, k, component)?;
    let dims = image.dimensions();
    let gradient = colorous::TURBO;
    let mut img = ::image::RgbImage::new(dims[0] as u32, dims[1] as u32);
    for (l, r) in values.iter().enumerate() {
        let x = l as u32 % img.width();
        let y = l as u32 / img.width();
        let c = gradient.eval_continuous(*r);
        img.put_pixel(x, y, ::image::Rgb(c.as_array()));
    }
    img.save(s).map_err(|e| GridError::output(e.to_string()))
}

use imagegrid::grid_args::Args;
use imagegrid::slice_image::write_slice_png;
use imagegrid::vtk::write_vtk;

fn main() {
    let args = Args::cli_parse("imagegrid");

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = {
        let server_addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
        tracing::info!(
            "Run this to view profiling data:  puffin_viewer {server_addr}"
        );
        profiling::puffin::set_scopes_on(true);
        puffin_http::Server::new(&server_addr).ok()
    };

    if let Err(e) = run(&args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> imagegrid::error::Result<()> {
    let mut image = args.grid()?;

    // Radial test field centred on the grid.
    let bounds = *image.bounds();
    let center = (bounds.min + bounds.max) * 0.5;
    let transform = *image.transform();
    image.par_set_scalars::<f64, _>(
        |coord, tuple| {
            let r = (transform.coord_to_physical(&coord) - center).norm();
            for (c, v) in tuple.iter_mut().enumerate() {
                *v = r * (c + 1) as f64;
            }
        },
        args.chunk_size,
    )?;
    profiling::finish_frame!();

    if let Some(crop) = args.crop_extent() {
        image.crop(&crop);
    }

    tracing::info!(
        "extent {} description {:?} points {} cells {}",
        image.extent(),
        image.description(),
        image.number_of_points(),
        image.number_of_cells()
    );
    tracing::info!("bounds {:?}", image.bounds().as_array());

    if let Some(x) = args.locate_point() {
        let x_slice = x.as_slice();
        match image.find_cell(&x, args.tolerance2) {
            Some(location) => tracing::info!(
                "{:?}: cell {} ijk {:?} pcoords {:?}",
                x_slice,
                location.cell_id,
                location.ijk.as_slice(),
                location.pcoords.as_slice()
            ),
            None => tracing::info!("{:?}: no cell", x_slice),
        }
        match image.find_point(&x) {
            Ok(point_id) => {
                tracing::info!("{:?}: nearest point {}", x_slice, point_id)
            }
            Err(e) => tracing::info!("{:?}: {}", x_slice, e),
        }
    }

    if let Some(path) = &args.vtk {
        write_vtk(&image, path)?;
    }
    if let Some(path) = &args.png {
        write_slice_png(&image, args.slice_index(&image), 0, path)?;
    }
    profiling::finish_frame!();
    Ok(())
}

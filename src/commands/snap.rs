use anyhow::Result;
use chairbook_core::scheduler::{Command, Scheduler};

use crate::render::Render;

pub fn run(
    scheduler: &mut Scheduler,
    y: f64,
    zoom: Option<u32>,
    staff: Option<String>,
) -> Result<()> {
    let preview = match zoom {
        Some(zoom) => {
            let mut axis = scheduler.time_axis();
            axis.zoom_pixels_per_hour = f64::from(zoom);
            axis.snap(y, scheduler.today(), staff.as_deref())
        }
        None => {
            let day = scheduler.today();
            scheduler.dispatch(Command::PointerMove {
                y,
                day,
                staff_id: staff,
            });
            match scheduler.hover() {
                Some(preview) => preview.clone(),
                None => anyhow::bail!("No hover preview produced"),
            }
        }
    };

    println!("{}", preview.render());
    Ok(())
}

//! Renderer argument vector.
//!
//! The render script reads its inputs positionally after Blender's `--`
//! separator, so the order below is the contract with the script:
//!
//! | # | Argument |
//! |---|----------|
//! | 0 | asset path |
//! | 1 | output path |
//! | 2 | LDraw library root |
//! | 3 | line thickness |
//! | 4 | fill color |
//! | 5 | camera latitude |
//! | 6 | camera longitude |
//! | 7 | resolution width |
//! | 8 | resolution height |
//! | 9 | framing padding |
//! | 10 | crease angle |
//! | 11 | edge type token |
//! | 12 | stroke color |

use std::path::Path;

use part_common::RenderParams;

/// Number of positional arguments the script expects.
pub const POSITIONAL_ARG_COUNT: usize = 13;

/// Inputs for one renderer run.
#[derive(Debug, Clone, Copy)]
pub struct RenderInvocation<'a> {
    pub asset_path: &'a Path,
    pub output_path: &'a Path,
    pub library_root: &'a Path,
    pub params: &'a RenderParams,
}

impl<'a> RenderInvocation<'a> {
    /// Arguments passed to the script, in contract order.
    pub fn positional_args(&self) -> Vec<String> {
        let p = self.params;
        vec![
            self.asset_path.to_string_lossy().into_owned(),
            self.output_path.to_string_lossy().into_owned(),
            self.library_root.to_string_lossy().into_owned(),
            format!("{:.1}", p.thickness),
            p.fill_color.clone(),
            format!("{:.6}", p.camera_latitude),
            format!("{:.6}", p.camera_longitude),
            p.resolution_x.to_string(),
            p.resolution_y.to_string(),
            format!("{:.6}", p.padding),
            format!("{:.6}", p.crease_angle),
            p.edge_types.token(),
            p.stroke_color.clone(),
        ]
    }

    /// Full Blender command line: background mode, the script, then the
    /// positional arguments after `--`.
    pub fn command_args(&self, render_script: &Path) -> Vec<String> {
        let mut args = vec![
            "--background".to_string(),
            "--python".to_string(),
            render_script.to_string_lossy().into_owned(),
            "--".to_string(),
        ];
        args.extend(self.positional_args());
        args
    }
}

/// Render frame axis permutation (row-major: [render_x, render_y, render_z])
/// Height is up in the render frame: X→X, Z (height)→Y, Y (depth)→Z
pub const RENDER_AXIS_TRANSFORM: [[f64; 3]; 3] = [
    [1.0, 0.0, 0.0], // X = X
    [0.0, 0.0, 1.0], // Y = Z
    [0.0, 1.0, 0.0], // Z = Y
];

/// Apply the render axis permutation to a game-space position.
/// Every placement of a terrain point in the scene goes through here.
pub fn to_render_frame(x: f64, y: f64, z: f64) -> [f64; 3] {
    let input = [x, y, z];
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[i] += RENDER_AXIS_TRANSFORM[i][j] * input[j];
        }
    }

    output
}

/// Map a render-frame position back to game space (the transpose of the permutation).
pub fn from_render_frame(render: [f64; 3]) -> (f64, f64, f64) {
    let mut output = [0.0; 3];

    for i in 0..3 {
        for j in 0..3 {
            output[j] += RENDER_AXIS_TRANSFORM[i][j] * render[i];
        }
    }

    (output[0], output[1], output[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_becomes_render_up() {
        assert_eq!(to_render_frame(1.0, 2.0, 3.0), [1.0, 3.0, 2.0]);
    }

    #[test]
    fn render_frame_inverts() {
        assert_eq!(from_render_frame([1.0, 3.0, 2.0]), (1.0, 2.0, 3.0));
    }
}

/// Maximum value of an 8-bit heightmap channel; heights normalise by this
pub const MAX_CHANNEL_VALUE: f64 = 255.0;

/// Default sampling window (u_center, v_center, u_span, v_span): the whole image
pub const DEFAULT_WINDOW: [f64; 4] = [0.5, 0.5, 1.0, 1.0];

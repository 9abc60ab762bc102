//! Small fixed-size vector and quaternion helpers.
//!
//! Vectors are plain arrays so they line up with [`crate::Value`] without
//! conversions. Quaternions are (x, y, z, w). Euler angles are degrees and
//! follow the z → x → y application order.

#[inline]
pub fn add3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale3(a: [f32; 3], s: f32) -> [f32; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot3(a: [f32; 3], b: [f32; 3]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross3(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn length3(a: [f32; 3]) -> f32 {
    dot3(a, a).sqrt()
}

#[inline]
pub fn distance3(a: [f32; 3], b: [f32; 3]) -> f32 {
    length3(sub3(a, b))
}

/// Returns `a` unchanged when its length is zero.
#[inline]
pub fn normalize3(a: [f32; 3]) -> [f32; 3] {
    let len = length3(a);
    if len > 0.0 {
        scale3(a, len.recip())
    } else {
        a
    }
}

/// Shorten `a` to at most `max_len`.
#[inline]
pub fn clamp_length3(a: [f32; 3], max_len: f32) -> [f32; 3] {
    let len = length3(a);
    if len > max_len && len > 0.0 {
        scale3(a, max_len / len)
    } else {
        a
    }
}

/// Euclidean magnitude of an arbitrary component slice.
#[inline]
pub fn magnitude(components: &[f32]) -> f32 {
    components.iter().map(|c| c * c).sum::<f32>().sqrt()
}

#[inline]
fn dot4(a: [f32; 4], b: [f32; 4]) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3]
}

#[inline]
pub fn normalize4(mut q: [f32; 4]) -> [f32; 4] {
    let len2 = dot4(q, q);
    if len2 > 0.0 {
        let inv_len = len2.sqrt().recip();
        q[0] *= inv_len;
        q[1] *= inv_len;
        q[2] *= inv_len;
        q[3] *= inv_len;
    }
    q
}

/// Hamilton product `a * b` (apply `b`, then `a`).
#[inline]
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [ax, ay, az, aw] = a;
    let [bx, by, bz, bw] = b;
    [
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
        aw * bw - ax * bx - ay * by - az * bz,
    ]
}

#[inline]
pub fn quat_from_axis_angle(axis: [f32; 3], radians: f32) -> [f32; 4] {
    let axis = normalize3(axis);
    let (s, c) = (radians * 0.5).sin_cos();
    [axis[0] * s, axis[1] * s, axis[2] * s, c]
}

/// Rotate `v` by the unit quaternion `q`.
#[inline]
pub fn quat_rotate(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    let u = [q[0], q[1], q[2]];
    let w = q[3];
    let t = scale3(cross3(u, v), 2.0);
    add3(add3(v, scale3(t, w)), cross3(u, t))
}

/// Build a quaternion from euler degrees, rotating around z, then x, then y.
pub fn quat_from_euler_deg(euler: [f32; 3]) -> [f32; 4] {
    let qx = quat_from_axis_angle([1.0, 0.0, 0.0], euler[0].to_radians());
    let qy = quat_from_axis_angle([0.0, 1.0, 0.0], euler[1].to_radians());
    let qz = quat_from_axis_angle([0.0, 0.0, 1.0], euler[2].to_radians());
    normalize4(quat_mul(qy, quat_mul(qx, qz)))
}

/// Inverse of [`quat_from_euler_deg`]; every angle is returned in [0, 360).
pub fn quat_to_euler_deg(q: [f32; 4]) -> [f32; 3] {
    let [x, y, z, w] = normalize4(q);
    let m00 = 1.0 - 2.0 * (y * y + z * z);
    let m02 = 2.0 * (x * z + w * y);
    let m10 = 2.0 * (x * y + w * z);
    let m11 = 1.0 - 2.0 * (x * x + z * z);
    let m12 = 2.0 * (y * z - w * x);
    let m20 = 2.0 * (x * z - w * y);
    let m22 = 1.0 - 2.0 * (x * x + y * y);

    let sin_x = (-m12).clamp(-1.0, 1.0);
    let (ex, ey, ez) = if sin_x.abs() > 0.99999 {
        // Gimbal lock: fold the z rotation into y.
        (sin_x.asin(), (-m20).atan2(m00), 0.0)
    } else {
        (sin_x.asin(), m02.atan2(m22), m10.atan2(m11))
    };
    [
        wrap_degrees(ex.to_degrees()),
        wrap_degrees(ey.to_degrees()),
        wrap_degrees(ez.to_degrees()),
    ]
}

/// Wrap an angle into [0, 360).
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

//! VSOP87D series for Venus: heliocentric ecliptic of date, units of 1e-8 rad or AU.

use super::Vsop87Series;

pub(super) static VENUS: Vsop87Series = Vsop87Series {
    longitude: &[L0, L1, L2, L3, L4, L5],
    latitude: &[B0, B1, B2, B3, B4],
    radius: &[R0, R1, R2, R3, R4],
};

#[rustfmt::skip]
const L0: &[[f64; 3]] = &[
    [317614667.0, 0.0, 0.0],
    [1353968.0, 5.5931332, 10213.2855462],
    [89892.0, 5.3065, 20426.57109],
    [5477.0, 4.4163, 7860.4194],
    [3456.0, 2.6996, 11790.6291],
    [2372.0, 2.9938, 3930.2097],
    [1664.0, 4.2502, 1577.3435],
    [1438.0, 4.1575, 9683.5946],
    [1317.0, 5.1867, 26.2983],
    [1201.0, 6.1536, 30639.8566],
    [769.0, 0.816, 9437.763],
    [761.0, 1.95, 529.691],
    [708.0, 1.065, 775.523],
    [585.0, 3.998, 191.448],
    [500.0, 4.123, 15720.839],
    [429.0, 3.586, 19367.189],
    [327.0, 5.677, 5507.553],
    [326.0, 4.591, 10404.734],
    [232.0, 3.163, 9153.904],
    [180.0, 4.653, 1109.379],
    [155.0, 5.57, 19651.048],
    [128.0, 4.226, 20.775],
    [128.0, 0.962, 5661.332],
    [106.0, 1.537, 801.821],
];

#[rustfmt::skip]
const L1: &[[f64; 3]] = &[
    [1021352943053.0, 0.0, 0.0],
    [95708.0, 2.46424, 10213.28555],
    [14445.0, 0.51625, 20426.57109],
    [213.0, 1.795, 30639.857],
    [174.0, 2.655, 26.298],
    [152.0, 6.106, 1577.344],
    [82.0, 5.7, 191.45],
    [70.0, 2.68, 9437.76],
    [52.0, 3.6, 775.52],
    [38.0, 1.03, 529.69],
    [30.0, 1.25, 5507.55],
    [25.0, 6.11, 10404.73],
];

#[rustfmt::skip]
const L2: &[[f64; 3]] = &[
    [54127.0, 0.0, 0.0],
    [3891.0, 0.3451, 10213.2855],
    [1338.0, 2.0201, 20426.5711],
    [24.0, 2.05, 26.3],
    [19.0, 3.54, 30639.86],
    [10.0, 3.97, 775.52],
    [7.0, 1.52, 1577.34],
    [6.0, 1.0, 191.45],
];

#[rustfmt::skip]
const L3: &[[f64; 3]] = &[
    [136.0, 4.804, 10213.286],
    [78.0, 3.67, 20426.57],
    [26.0, 0.0, 0.0],
];

#[rustfmt::skip]
const L4: &[[f64; 3]] = &[
    [114.0, 3.1416, 0.0],
    [3.0, 5.21, 20426.57],
    [2.0, 2.51, 10213.29],
];

#[rustfmt::skip]
const L5: &[[f64; 3]] = &[
    [1.0, 3.14, 0.0],
];

#[rustfmt::skip]
const B0: &[[f64; 3]] = &[
    [5923638.0, 0.2670278, 10213.2855462],
    [40108.0, 1.14737, 20426.57109],
    [32815.0, 3.14159, 0.0],
    [1011.0, 1.0895, 30639.8566],
    [149.0, 6.254, 18073.705],
    [138.0, 0.86, 1577.344],
    [130.0, 3.672, 9437.763],
    [120.0, 3.705, 2352.866],
    [108.0, 4.539, 22003.915],
];

#[rustfmt::skip]
const B1: &[[f64; 3]] = &[
    [513348.0, 1.803643, 10213.285546],
    [4380.0, 3.3862, 20426.5711],
    [199.0, 0.0, 0.0],
    [197.0, 2.53, 30639.857],
];

#[rustfmt::skip]
const B2: &[[f64; 3]] = &[
    [22378.0, 3.38509, 10213.28555],
    [282.0, 0.0, 0.0],
    [173.0, 5.256, 20426.571],
    [27.0, 3.87, 30639.86],
];

#[rustfmt::skip]
const B3: &[[f64; 3]] = &[
    [647.0, 4.992, 10213.286],
    [20.0, 3.14, 0.0],
    [6.0, 0.77, 20426.57],
    [3.0, 5.44, 30639.86],
];

#[rustfmt::skip]
const B4: &[[f64; 3]] = &[
    [14.0, 0.32, 10213.29],
];

#[rustfmt::skip]
const R0: &[[f64; 3]] = &[
    [72334821.0, 0.0, 0.0],
    [489824.0, 4.021518, 10213.285546],
    [1658.0, 4.9021, 20426.5711],
    [1632.0, 2.8455, 7860.4194],
    [1378.0, 1.1285, 11790.6291],
    [498.0, 2.587, 9683.595],
    [374.0, 1.423, 3930.21],
    [264.0, 5.529, 9437.763],
    [237.0, 2.551, 15720.839],
    [222.0, 2.013, 19367.189],
    [126.0, 2.728, 1577.344],
    [119.0, 3.02, 10404.734],
];

#[rustfmt::skip]
const R1: &[[f64; 3]] = &[
    [34551.0, 0.89199, 10213.28555],
    [234.0, 1.772, 20426.571],
    [234.0, 3.142, 0.0],
];

#[rustfmt::skip]
const R2: &[[f64; 3]] = &[
    [1407.0, 5.0637, 10213.2855],
    [16.0, 5.47, 20426.57],
    [13.0, 0.0, 0.0],
];

#[rustfmt::skip]
const R3: &[[f64; 3]] = &[
    [50.0, 3.22, 10213.29],
];

#[rustfmt::skip]
const R4: &[[f64; 3]] = &[
    [1.0, 0.92, 10213.29],
];

//! Sub-block directory of a two-scene document with a pyramid.
//!
//! Each row is `(coordinate, M-index, x, y, w, h, stored w, stored h)`.

pub type FixtureRow = (&'static str, Option<i32>, i32, i32, i32, i32, u32, u32);

pub const TWO_SCENE_DIRECTORY: [FixtureRow; 161] = [
    ("C0S0", Some(0), -5657, -6196, 2048, 2048, 2048, 2048),
    ("C0S0", Some(1), -3814, -6196, 2048, 2048, 2048, 2048),
    ("C0S0", Some(2), -1970, -6196, 2048, 2048, 2048, 2048),
    ("C0S0", Some(3), -127, -6196, 2048, 2048, 2048, 2048),
    ("C0S0", Some(4), 1716, -6196, 2048, 2048, 2048, 2048),
    ("C0S0", Some(5), 3559, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, -4354, 820, 206, 410, 103),
    ("C0S0", Some(6), 1716, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, 2740, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(7), -127, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, 692, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(8), -1970, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, -1356, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(9), -3814, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, -3404, -4148, 2048, 1844, 1024, 922),
    ("C0S0", None, -3404, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(10), -5657, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, -5452, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(11), -7500, -4353, 2048, 2048, 2048, 2048),
    ("C0S0", None, -7500, -6196, 2048, 2048, 1024, 1024),
    ("C0S0", Some(12), -7500, -2509, 2048, 2048, 2048, 2048),
    ("C0S0", Some(13), -5657, -2509, 2048, 2048, 2048, 2048),
    ("C0S0", None, -7500, -4148, 2048, 2048, 1024, 1024),
    ("C0S0", None, -5452, -4148, 2048, 2048, 1024, 1024),
    ("C0S0", None, -7500, -6196, 4096, 4096, 1024, 1024),
    ("C0S0", Some(14), -127, -2509, 2048, 2048, 2048, 2048),
    ("C0S0", None, -128, -2100, 820, 1640, 410, 820),
    ("C0S0", None, -128, -2100, 820, 1640, 205, 410),
    ("C0S0", None, -1356, -4148, 2048, 2048, 1024, 1024),
    ("C0S0", None, -3404, -6196, 4096, 4096, 1024, 1024),
    ("C0S0", Some(15), 1716, -2509, 2048, 2048, 2048, 2048),
    ("C0S0", None, 692, -4148, 2048, 2048, 1024, 1024),
    ("C0S0", Some(16), 3559, -2509, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, -4148, 820, 2048, 410, 1024),
    ("C0S0", None, 4788, -4356, 820, 2256, 205, 564),
    ("C0S0", None, 2740, -4148, 2048, 2048, 1024, 1024),
    ("C0S0", None, 692, -6196, 4096, 4096, 1024, 1024),
    ("C0S0", Some(17), 3559, -666, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, -2100, 820, 2048, 410, 1024),
    ("C0S0", Some(18), 1716, -666, 2048, 2048, 2048, 2048),
    ("C0S0", None, 2740, -2100, 2048, 2048, 1024, 1024),
    ("C0S0", None, 692, -2100, 2048, 2048, 1024, 1024),
    ("C0S0", Some(19), -5657, -666, 2048, 2048, 2048, 2048),
    ("C0S0", Some(20), -7500, -666, 2048, 2048, 2048, 2048),
    ("C0S0", None, -5452, -52, 1844, 1434, 922, 717),
    ("C0S0", None, -7500, -52, 2048, 1434, 1024, 717),
    ("C0S0", None, -5452, -2100, 1844, 2048, 922, 1024),
    ("C0S0", None, -7500, -2100, 2048, 2048, 1024, 1024),
    ("C0S0", None, -7500, -2100, 3892, 3484, 973, 871),
    ("C0S0", None, -7500, -6196, 8192, 7584, 1024, 948),
    ("C0S0", Some(21), 1716, 1177, 2048, 2048, 2048, 2048),
    ("C0S0", None, 1716, -52, 1024, 2048, 512, 1024),
    ("C0S0", Some(22), 3559, 1177, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, -52, 820, 2048, 410, 1024),
    ("C0S0", None, 4788, -2100, 820, 4096, 205, 1024),
    ("C0S0", None, 2740, -52, 2048, 2048, 1024, 1024),
    ("C0S0", None, 692, -2100, 4096, 4096, 1024, 1024),
    ("C0S0", None, 692, -6196, 4920, 8192, 615, 1024),
    ("C0S0", Some(23), 3559, 3020, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, 1996, 820, 2048, 410, 1024),
    ("C0S0", Some(24), 1716, 3020, 2048, 2048, 2048, 2048),
    ("C0S0", None, 1716, 1996, 1024, 2048, 512, 1024),
    ("C0S0", None, 2740, 1996, 2048, 2048, 1024, 1024),
    ("C0S0", Some(25), -1970, 4863, 2048, 2048, 2048, 2048),
    ("C0S0", None, -1970, 4862, 614, 1230, 307, 615),
    ("C0S0", Some(26), -127, 4863, 2048, 2048, 2048, 2048),
    ("C0S0", None, -1356, 4862, 2048, 1230, 1024, 615),
    ("C0S0", None, -1972, 4860, 2664, 1232, 666, 308),
    ("C0S0", Some(27), 1716, 4863, 2048, 2048, 2048, 2048),
    ("C0S0", None, 692, 4044, 2048, 2048, 1024, 1024),
    ("C0S0", Some(28), 3559, 4863, 2048, 2048, 2048, 2048),
    ("C0S0", None, 4788, 6092, 820, 820, 410, 410),
    ("C0S0", None, 4788, 6092, 820, 820, 205, 205),
    ("C0S0", None, 4788, 4044, 820, 2048, 410, 1024),
    ("C0S0", None, 4788, 1996, 820, 4096, 205, 1024),
    ("C0S0", None, 2740, 4044, 2048, 2048, 1024, 1024),
    ("C0S0", None, 692, 1996, 4096, 4096, 1024, 1024),
    ("C0S0", Some(29), 1716, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", None, 2740, 8140, 1024, 616, 512, 308),
    ("C0S0", None, 2740, 6092, 2048, 2048, 1024, 1024),
    ("C0S0", Some(30), -127, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", None, 692, 8140, 2048, 616, 1024, 308),
    ("C0S0", None, 692, 6092, 2048, 2048, 1024, 1024),
    ("C0S0", None, 692, 6092, 4096, 2664, 1024, 666),
    ("C0S0", None, 692, 1996, 4920, 6760, 615, 845),
    ("C0S0", Some(31), -1970, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", None, -1356, 8140, 2048, 616, 1024, 308),
    ("C0S0", None, -1356, 6092, 2048, 2048, 1024, 1024),
    ("C0S0", Some(32), -3814, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", Some(33), -5657, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", None, -3404, 8140, 2048, 616, 1024, 308),
    ("C0S0", None, -3404, 6092, 2048, 2048, 1024, 1024),
    ("C0S0", None, -3404, 6092, 4096, 2664, 1024, 666),
    ("C0S0", Some(34), -7500, 6707, 2048, 2048, 2048, 2048),
    ("C0S0", None, -5452, 8140, 2048, 616, 1024, 308),
    ("C0S0", None, -7500, 8140, 2048, 616, 1024, 308),
    ("C0S0", None, -7500, 6706, 2048, 1434, 1024, 717),
    ("C0S0", None, -5452, 6706, 2048, 1434, 1024, 717),
    ("C0S0", None, -7500, 6704, 4096, 2052, 1024, 513),
    ("C0S0", None, -7500, 4860, 8192, 3896, 1024, 487),
    ("C0S0", None, -7500, -6196, 13120, 14960, 820, 935),
    ("C0S1", Some(0), -14075, 129, 2048, 2048, 2048, 2048),
    ("C0S1", Some(1), -12231, 129, 2048, 2048, 2048, 2048),
    ("C0S1", Some(2), -3015, 129, 2048, 2048, 2048, 2048),
    ("C0S1", Some(3), -1172, 129, 2048, 2048, 2048, 2048),
    ("C0S1", Some(4), -1172, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, 261, 2177, 616, 1844, 308, 922),
    ("C0S1", None, 261, 129, 616, 2048, 308, 1024),
    ("C0S1", Some(5), -3015, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -1787, 2177, 2048, 1844, 1024, 922),
    ("C0S1", None, -1787, 129, 2048, 2048, 1024, 1024),
    ("C0S1", None, -1787, 129, 2664, 3892, 666, 973),
    ("C0S1", Some(6), -4859, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -3835, 129, 2048, 2048, 1024, 1024),
    ("C0S1", Some(7), -6702, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -5883, 1971, 2048, 206, 1024, 103),
    ("C0S1", Some(8), -8545, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -7931, 1971, 2048, 206, 1024, 103),
    ("C0S1", Some(9), -10388, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -9979, 1971, 2048, 206, 1024, 103),
    ("C0S1", Some(10), -12231, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", Some(11), -14075, 1972, 2048, 2048, 2048, 2048),
    ("C0S1", None, -12027, 129, 2048, 2048, 1024, 1024),
    ("C0S1", None, -14075, 129, 2048, 2048, 1024, 1024),
    ("C0S1", Some(12), -14075, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", Some(13), -12231, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", None, -14075, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", Some(14), -10388, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", None, -12027, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", None, -14075, 129, 4096, 4096, 1024, 1024),
    ("C0S1", Some(15), -8545, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", None, -9979, 4225, 2048, 1638, 1024, 819),
    ("C0S1", None, -9979, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", Some(16), -6702, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", None, -7931, 4225, 2048, 1638, 1024, 819),
    ("C0S1", None, -7931, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", None, -9979, 4225, 4096, 1640, 1024, 410),
    ("C0S1", None, -9979, 1969, 4096, 2256, 1024, 564),
    ("C0S1", Some(17), -4859, 3815, 2048, 2048, 2048, 2048),
    ("C0S1", None, -3835, 4225, 1024, 1638, 512, 819),
    ("C0S1", None, -5883, 4225, 2048, 1638, 1024, 819),
    ("C0S1", None, -3835, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", None, -5883, 2177, 2048, 2048, 1024, 1024),
    ("C0S1", None, -5883, 4225, 3072, 1640, 768, 410),
    ("C0S1", None, -5883, 129, 4096, 4096, 1024, 1024),
    ("C0S1", None, -5883, 129, 6760, 5736, 845, 717),
    ("C0S1", Some(18), -12231, 5658, 2048, 2048, 2048, 2048),
    ("C0S1", Some(19), -14075, 5658, 2048, 2048, 2048, 2048),
    ("C0S1", None, -12027, 4225, 2048, 2048, 1024, 1024),
    ("C0S1", None, -14075, 4225, 2048, 2048, 1024, 1024),
    ("C0S1", Some(20), -14075, 7502, 2048, 2048, 2048, 2048),
    ("C0S1", Some(21), -12231, 7502, 2048, 2048, 2048, 2048),
    ("C0S1", None, -12027, 8321, 1844, 1230, 922, 615),
    ("C0S1", None, -14075, 8321, 2048, 1230, 1024, 615),
    ("C0S1", None, -12027, 6273, 1844, 2048, 922, 1024),
    ("C0S1", None, -14075, 8321, 3892, 1232, 973, 308),
    ("C0S1", None, -14075, 8321, 3896, 1232, 487, 154),
    ("C0S1", None, -14075, 6273, 2048, 2048, 1024, 1024),
    ("C0S1", None, -14075, 4225, 4096, 4096, 1024, 1024),
    ("C0S1", None, -14075, 129, 8192, 8192, 1024, 1024),
    ("C0S1", None, -14075, 129, 14960, 9424, 935, 589),
];

//! 开发环境种子数据

/// 种子商品
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixtureProduct {
    pub name: &'static str,
    pub description: &'static str,
    pub retail_price: f64,
    pub wholesale_price: f64,
    pub category: &'static str,
    pub stock: i64,
    pub pic_url: &'static str,
}

/// 每次开发环境启动时重新写入的商品目录
pub const FIXTURE_CATALOG: &[FixtureProduct] = &[
    FixtureProduct {
        name: "Greenscreen",
        description: "Greenscreen",
        retail_price: 4000.00,
        wholesale_price: 3698.99,
        category: "Greenscreen",
        stock: 20,
        pic_url: "EXAMPLEURL.jpg",
    },
    FixtureProduct {
        name: "WebCam",
        description: "webcam",
        retail_price: 850.95,
        wholesale_price: 800.00,
        category: "Webcam",
        stock: 20,
        pic_url: "EXAMPLEURL.jpg",
    },
    FixtureProduct {
        name: "webcam",
        description: "Webcam",
        retail_price: 2299.95,
        wholesale_price: 2000.00,
        category: "Webcam",
        stock: 20,
        pic_url: "EXAMPLEURL.jpg",
    },
];

pub mod assets {

    /// Fixed set of asset categories. Not user-extensible.
    pub const CATEGORIES: &[&str] = &[
        "笔记本电脑",
        "插线板",
        "打印机及设备",
        "打印云盒",
        "电脑显示屏",
        "电脑主机",
        "读卡器",
        "翻页笔",
        "键盘",
        "麦克风",
        "内存条",
        "拍摄用品",
        "其他",
        "手机",
        "鼠标",
        "投影",
        "网络",
        "相机",
        "遥控器",
        "音响",
        "硬盘",
        "转接线",
    ];

    /// A repair result containing this token marks the asset as fixed.
    pub const REPAIRED_MARKER: &str = "已修复";

    pub const DEFAULT_QUANTITY: i32 = 1;
}

pub mod limits {

    pub const MAX_LISTED_ERRORS: usize = 10;
}

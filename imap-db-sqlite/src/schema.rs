///////////////////////////////////////////////////////////////////////
// Reports
///////////////////////////////////////////////////////////////////////

table! {
    reports (rowid) {
        rowid -> BigInt,
        id -> Text,
        caption -> Nullable<Text>,
        category -> Text,
        severity -> Nullable<BigInt>,
        img_full -> Text,
        img_thumb -> Text,
        lat -> Nullable<Double>,
        lng -> Nullable<Double>,
        taken_at -> Nullable<BigInt>,
        reported_at -> BigInt,
    }
}

quantity!(Kilograms, via: f64, suffix: "kg", precision: 3);

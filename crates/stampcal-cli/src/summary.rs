use console::Style;
use stampcal_core::calibrate::StampBlob;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().dim().yellow(),
        }
    }
}

pub fn print_blob_summary(stamp_id: &str, blob: &StampBlob) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to(format!("Stamp {stamp_id}")));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    for image in blob {
        println!("  {}", s.header.apply_to(format!("Band {}", image.band)));
        println!(
            "    {:<12}{}",
            s.label.apply_to("Size"),
            s.value.apply_to(format!("{}x{}", image.width(), image.height()))
        );

        let iota = image.calibration().first().copied().unwrap_or(0.0);
        let epsilon = image.sky().level_at(0, 0).unwrap_or(0.0);
        println!(
            "    {:<12}{}",
            s.label.apply_to("Iota"),
            s.value.apply_to(format!("{iota:.3}"))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Epsilon"),
            s.value.apply_to(format!("{epsilon:.4}"))
        );

        let total: f64 = image.pixels.sum();
        let negative = image.pixels.iter().filter(|&&v| v < 0.0).count();
        println!(
            "    {:<12}{}",
            s.label.apply_to("Photons"),
            s.value.apply_to(format!("{total:.0}"))
        );
        if negative > 0 {
            println!(
                "    {:<12}{}",
                s.label.apply_to(""),
                s.warn.apply_to(format!("{negative} negative pixel(s)"))
            );
        }

        let weights: Vec<String> = image
            .psf
            .iter()
            .map(|c| format!("{:.3}", c.weight()))
            .collect();
        println!(
            "    {:<12}{}",
            s.label.apply_to("PSF weights"),
            s.value.apply_to(weights.join(" / "))
        );

        let p = image.provenance;
        println!(
            "    {:<12}{}",
            s.label.apply_to("Exposure"),
            s.value.apply_to(format!("{}/{}/{}", p.run, p.camcol, p.field))
        );
        println!();
    }
}

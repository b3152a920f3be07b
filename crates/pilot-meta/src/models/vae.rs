//! Options of the calorimeter `vae` model.

use crate::{OptionDescriptor, OptionGroup, Validator};

pub const NAME: &str = "vae";

const ACTIVATIONS: [&str; 4] = ["leaky_relu", "relu", "tanh", "sigmoid"];

const INITIALIZERS: [&str; 13] = [
    "RandomNormal",
    "RandomUniform",
    "TruncatedNormal",
    "VarianceScaling",
    "Orthogonal",
    "LecunNormal",
    "GlorotNormal",
    "GlorotUniform",
    "HeNormal",
    "HeUniform",
    "Identity",
    "Ones",
    "Zeros",
];

fn int(name: &str, help: &str, default: i64, min: i64) -> OptionDescriptor {
    OptionDescriptor::new(name, help)
        .with_default(default)
        .with_validator(Validator::int_min(min))
}

fn float(name: &str, help: &str, default: f64, validator: Validator) -> OptionDescriptor {
    OptionDescriptor::new(name, help)
        .with_default(default)
        .with_validator(validator)
}

fn text(name: &str, help: &str, default: &str) -> OptionDescriptor {
    OptionDescriptor::new(name, help)
        .with_default(default)
        .with_validator(Validator::String)
}

fn choice(name: &str, help: &str, default: &str, choices: &[&str]) -> OptionDescriptor {
    OptionDescriptor::new(name, help)
        .with_default(default)
        .with_validator(Validator::choice(choices.iter().copied()))
}

pub fn options() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .extend(geometry())
        .extend(dataloader())
        .extend(network())
        .extend(plotting())
        .extend(tracking())
}

fn geometry() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .with(int("cylinder_z_cell_no", "Cells along z of the cylinder", 45, 1))
        .with(int("cylinder_rho_cell_no", "Cells along rho of the cylinder", 18, 1))
        .with(int("cylinder_phi_cell_no", "Cells along phi of the cylinder", 50, 1))
        .with(float(
            "cylinder_rho_cell_size",
            "Cell size along rho in mm",
            9.0,
            Validator::float_min(0.0),
        ))
        .with(float(
            "cylinder_z_cell_size",
            "Cell size along z in mm",
            13.824,
            Validator::float_min(0.0),
        ))
        .with(float(
            "max_theta",
            "Maximum particle angle in degrees",
            90.0,
            Validator::float_range(0.0, 360.0),
        ))
        .with(float(
            "max_energy",
            "Maximum particle energy in GeV",
            1024.0,
            Validator::float_min(0.0),
        ))
}

fn dataloader() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .with(
            OptionDescriptor::new("root_files_path", "Path to the native ROOT training files")
                .with_null_default()
                .path(),
        )
        .with(text(
            "hits_key",
            "Key of the hits in the ROOT files",
            "Gsino__CaloChallenge__TrainingDataCollector/CaloHits;1",
        ))
        .with(text(
            "particles_key",
            "Key of the particles in the ROOT files",
            "Gsino__CaloChallenge__TrainingDataCollector/CollectorHits;1",
        ))
        .with(float(
            "validation_split",
            "Validation share of the events in each ROOT file",
            0.2,
            Validator::float_range(0.0, 1.0),
        ))
        .with(float(
            "test_split",
            "Test share of the events in each ROOT file",
            0.1,
            Validator::float_range(0.0, 1.0),
        ))
}

fn network() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .with(int("geometry_condition_length", "Length of the geometry condition", 3, 1))
        .with(int(
            "geometry_condition_position",
            "Position in the geometry condition vector",
            0,
            0,
        ))
        .with(choice(
            "input_activation",
            "Activation of the input layers",
            "leaky_relu",
            &ACTIVATIONS,
        ))
        .with(choice(
            "output_activation",
            "Activation of the output layers",
            "sigmoid",
            &ACTIVATIONS,
        ))
        .with(
            OptionDescriptor::new("intermediate_dims", "Dimensions of the intermediate layers")
                .with_default(vec![100, 50, 20, 15])
                .with_validator(Validator::list_of(Validator::int_min(1))),
        )
        .with(int("latent_dim", "Dimension of the latent space", 10, 1))
        .with(choice(
            "kernel_initializer",
            "Initializer of the kernel weights",
            "RandomNormal",
            &INITIALIZERS,
        ))
        .with(choice(
            "bias_initializer",
            "Initializer of the bias weights",
            "Zeros",
            &INITIALIZERS,
        ))
        .with(choice(
            "reconstruction_loss",
            "Reconstruction loss",
            "bce",
            &["mse", "bce"],
        ))
}

fn plotting() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .with(int("plot_frequency", "Plot every n epochs", 10, 0))
        .with(text("plots_full_sim_histogram_color", "Full simulation histogram color", "blue"))
        .with(text("plots_ml_sim_histogram_color", "ML simulation histogram color", "red"))
        .with(text("plots_full_sim_gaussian_color", "Full simulation gaussian color", "green"))
        .with(text("plots_ml_sim_gaussian_color", "ML simulation gaussian color", "orange"))
        .with(choice("plots_histogram_type", "Histogram type", "step", &["step", "bar"]))
        .with(text("plots_mplhep_experiment_header_name", "Experiment header name", "Gauss"))
        .with(text(
            "plots_mplhep_llabel_header_name",
            "Left label of the experiment header",
            "Private Simulation",
        ))
        .with(
            OptionDescriptor::new(
                "plots_mplhep_rlabel_header_name",
                "Right label of the experiment header",
            )
            .with_null_default()
            .with_validator(Validator::String),
        )
        .with(int("plots_mplhep_fontsize", "Experiment header font size", 20, 1))
        .with(
            OptionDescriptor::new("plots_mplhep_legend_loc", "Legend location")
                .with_default(1)
                .with_validator(Validator::int_range(0, 10)),
        )
        .with(int("plots_figsize_x", "Figure width", 16, 1))
        .with(int("plots_figsize_y", "Figure height", 8, 1))
}

fn tracking() -> OptionGroup {
    OptionGroup::for_model(NAME)
        .with(
            OptionDescriptor::new("wandb_entity", "Weights & Biases entity")
                .with_null_default()
                .with_validator(Validator::String),
        )
        .with(
            OptionDescriptor::new("wandb_tags", "Weights & Biases tags")
                .with_default(Vec::<String>::new())
                .with_validator(Validator::list_of(Validator::String)),
        )
}

/// Element data needed for balancing: symbols, standard atomic weights and the
/// default valences used to derive implicit hydrogens of SMILES organic-subset atoms.
///
// Define a struct to hold element data
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_mass: f64,
}

const fn el(symbol: &'static str, atomic_mass: f64) -> Element {
    Element {
        symbol,
        atomic_mass,
    }
}

// standard atomic weights, mass number of the most stable isotope for synthetic elements
const ELEMENTS: [Element; 118] = [
    el("H", 1.008),
    el("He", 4.0026),
    el("Li", 6.94),
    el("Be", 9.0122),
    el("B", 10.81),
    el("C", 12.011),
    el("N", 14.007),
    el("O", 15.999),
    el("F", 18.998),
    el("Ne", 20.18),
    el("Na", 22.99),
    el("Mg", 24.305),
    el("Al", 26.982),
    el("Si", 28.085),
    el("P", 30.974),
    el("S", 32.06),
    el("Cl", 35.45),
    el("Ar", 39.948),
    el("K", 39.098),
    el("Ca", 40.078),
    el("Sc", 44.956),
    el("Ti", 47.867),
    el("V", 50.942),
    el("Cr", 51.996),
    el("Mn", 54.938),
    el("Fe", 55.845),
    el("Co", 58.933),
    el("Ni", 58.693),
    el("Cu", 63.546),
    el("Zn", 65.38),
    el("Ga", 69.723),
    el("Ge", 72.63),
    el("As", 74.922),
    el("Se", 78.971),
    el("Br", 79.904),
    el("Kr", 83.798),
    el("Rb", 85.468),
    el("Sr", 87.62),
    el("Y", 88.906),
    el("Zr", 91.224),
    el("Nb", 92.906),
    el("Mo", 95.95),
    el("Tc", 98.0),
    el("Ru", 101.07),
    el("Rh", 102.91),
    el("Pd", 106.42),
    el("Ag", 107.87),
    el("Cd", 112.41),
    el("In", 114.82),
    el("Sn", 118.71),
    el("Sb", 121.76),
    el("Te", 127.6),
    el("I", 126.9),
    el("Xe", 131.29),
    el("Cs", 132.91),
    el("Ba", 137.33),
    el("La", 138.91),
    el("Ce", 140.12),
    el("Pr", 140.91),
    el("Nd", 144.24),
    el("Pm", 145.0),
    el("Sm", 150.36),
    el("Eu", 151.96),
    el("Gd", 157.25),
    el("Tb", 158.93),
    el("Dy", 162.5),
    el("Ho", 164.93),
    el("Er", 167.26),
    el("Tm", 168.93),
    el("Yb", 173.05),
    el("Lu", 174.97),
    el("Hf", 178.49),
    el("Ta", 180.95),
    el("W", 183.84),
    el("Re", 186.21),
    el("Os", 190.23),
    el("Ir", 192.22),
    el("Pt", 195.08),
    el("Au", 196.97),
    el("Hg", 200.59),
    el("Tl", 204.38),
    el("Pb", 207.2),
    el("Bi", 208.98),
    el("Po", 209.0),
    el("At", 210.0),
    el("Rn", 222.0),
    el("Fr", 223.0),
    el("Ra", 226.0),
    el("Ac", 227.0),
    el("Th", 232.04),
    el("Pa", 231.04),
    el("U", 238.03),
    el("Np", 237.0),
    el("Pu", 244.0),
    el("Am", 243.0),
    el("Cm", 247.0),
    el("Bk", 247.0),
    el("Cf", 251.0),
    el("Es", 252.0),
    el("Fm", 257.0),
    el("Md", 258.0),
    el("No", 259.0),
    el("Lr", 266.0),
    el("Rf", 267.0),
    el("Db", 268.0),
    el("Sg", 269.0),
    el("Bh", 270.0),
    el("Hs", 277.0),
    el("Mt", 278.0),
    el("Ds", 281.0),
    el("Rg", 282.0),
    el("Cn", 285.0),
    el("Nh", 286.0),
    el("Fl", 289.0),
    el("Mc", 290.0),
    el("Lv", 293.0),
    el("Ts", 294.0),
    el("Og", 294.0),
];

/// Looks an element up by its case-sensitive symbol ("Na", not "NA").
pub fn find_element(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|element| element.symbol == symbol)
}

pub fn is_element(symbol: &str) -> bool {
    find_element(symbol).is_some()
}

pub fn atomic_mass(symbol: &str) -> Option<f64> {
    find_element(symbol).map(|element| element.atomic_mass)
}

/// Valences an unbracketed SMILES atom may take, lowest first. Empty for
/// elements outside the organic subset.
pub fn default_valences(symbol: &str) -> &'static [u32] {
    match symbol {
        "H" => &[1],
        "B" => &[3],
        "C" => &[4],
        "N" => &[3, 5],
        "O" => &[2],
        "F" | "Cl" | "Br" | "At" => &[1],
        "Si" | "Ge" => &[4],
        "P" | "As" => &[3, 5],
        "S" | "Se" | "Te" => &[2, 4, 6],
        "I" => &[1, 3, 5, 7],
        _ => &[],
    }
}
